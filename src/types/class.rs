//! Cache classes and their freshness table.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::KitsuneError;

/// Tag selecting which freshness duration applies to a cached response.
///
/// Every JSON fetch declares exactly one class. The duration table is
/// fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheClass {
    Home,
    Ongoing,
    Completed,
    Schedule,
    Unlimited,
    Genre,
    Anime,
    Episode,
    Search,
    Server,
    Batch,
}

impl CacheClass {
    /// Every class, in declaration order.
    pub const ALL: [CacheClass; 11] = [
        CacheClass::Home,
        CacheClass::Ongoing,
        CacheClass::Completed,
        CacheClass::Schedule,
        CacheClass::Unlimited,
        CacheClass::Genre,
        CacheClass::Anime,
        CacheClass::Episode,
        CacheClass::Search,
        CacheClass::Server,
        CacheClass::Batch,
    ];

    /// How long a response of this class stays fresh.
    pub const fn ttl(self) -> Duration {
        let secs = match self {
            CacheClass::Home | CacheClass::Ongoing => 600,
            CacheClass::Completed => 900,
            CacheClass::Schedule
            | CacheClass::Unlimited
            | CacheClass::Genre
            | CacheClass::Episode => 3600,
            CacheClass::Anime | CacheClass::Batch => 1800,
            CacheClass::Search => 300,
            CacheClass::Server => 120,
        };
        Duration::from_secs(secs)
    }

    /// Lowercase name, as used in cache keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            CacheClass::Home => "home",
            CacheClass::Ongoing => "ongoing",
            CacheClass::Completed => "completed",
            CacheClass::Schedule => "schedule",
            CacheClass::Unlimited => "unlimited",
            CacheClass::Genre => "genre",
            CacheClass::Anime => "anime",
            CacheClass::Episode => "episode",
            CacheClass::Search => "search",
            CacheClass::Server => "server",
            CacheClass::Batch => "batch",
        }
    }
}

impl fmt::Display for CacheClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheClass {
    type Err = KitsuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheClass::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| KitsuneError::InvalidInput(format!("unknown cache class: {s}")))
    }
}
