//! Version information.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name and version, e.g. `kitsune/0.1.0`.
pub fn version_string() -> String {
    format!("{}/{PKG_VERSION}", env!("CARGO_PKG_NAME"))
}
