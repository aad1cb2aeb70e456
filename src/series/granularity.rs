use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 5-minute bucket size in seconds
pub const BUCKET_5M_SEC: i64 = 300;
/// Hourly bucket size in seconds
pub const BUCKET_1H_SEC: i64 = 3600;

/// Longest lookback served from raw readings (30 minutes)
pub const RAW_MAX_LOOKBACK_SEC: i64 = 1800;
/// Shortest lookback served from hourly aggregates (1 day)
pub const HOURLY_MIN_LOOKBACK_SEC: i64 = 86_400;

/// Resolution tier backing a series query.
///
/// Raw readings for short views, pre-aggregated 5-minute or hourly buckets
/// for everything else. The aggregation job producing the buckets is
/// external; this service only chooses which collection to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Granularity {
    #[serde(rename = "raw")]
    Raw,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "hourly")]
    Hourly,
}

impl Granularity {
    /// Pick the tier for a lookback, unless the caller forces one.
    ///
    /// The explicit override always wins; the dashboard uses it to force
    /// raw readings for its 5/15/30-minute views regardless of the rule.
    /// Total for all positive lookbacks.
    #[must_use]
    pub fn select(lookback_sec: i64, forced: Option<Granularity>) -> Granularity {
        if let Some(g) = forced {
            return g;
        }
        if lookback_sec <= RAW_MAX_LOOKBACK_SEC {
            Granularity::Raw
        } else if lookback_sec >= HOURLY_MIN_LOOKBACK_SEC {
            Granularity::Hourly
        } else {
            Granularity::FiveMinute
        }
    }

    /// Bucket size in seconds; `None` for raw readings, which are not
    /// bucket-aligned.
    #[must_use]
    pub fn bucket_sec(self) -> Option<i64> {
        match self {
            Granularity::Raw => None,
            Granularity::FiveMinute => Some(BUCKET_5M_SEC),
            Granularity::Hourly => Some(BUCKET_1H_SEC),
        }
    }

    /// Backing collection in the document store.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Granularity::Raw => "readings",
            Granularity::FiveMinute => "stats_5m",
            Granularity::Hourly => "stats_hourly",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Raw => "raw",
            Granularity::FiveMinute => "5m",
            Granularity::Hourly => "hourly",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Granularity::Raw),
            "5m" => Ok(Granularity::FiveMinute),
            "hourly" => Ok(Granularity::Hourly),
            other => Err(format!(
                "Invalid granularity: {other}. Must be one of: raw, 5m, hourly"
            )),
        }
    }
}
