// Resolution domain model - how densely a range query samples its window
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_STEP_MS: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Resolution {
    Low,
    Medium,
    High,
    /// A fixed step that ignores the queried range.
    Fixed(FixedStep),
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedStep {
    TenSeconds,
    ThirtySeconds,
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
}

impl FixedStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixedStep::TenSeconds => "10s",
            FixedStep::ThirtySeconds => "30s",
            FixedStep::OneMinute => "1m",
            FixedStep::FiveMinutes => "5m",
            FixedStep::FifteenMinutes => "15m",
            FixedStep::OneHour => "1h",
        }
    }

    pub fn millis(&self) -> i64 {
        match self {
            FixedStep::TenSeconds => 10_000,
            FixedStep::ThirtySeconds => 30_000,
            FixedStep::OneMinute => 60_000,
            FixedStep::FiveMinutes => 300_000,
            FixedStep::FifteenMinutes => 900_000,
            FixedStep::OneHour => 3_600_000,
        }
    }
}

impl Resolution {
    pub fn parse(name: &str) -> Self {
        match name {
            "low" => Resolution::Low,
            "medium" => Resolution::Medium,
            "high" => Resolution::High,
            "10s" => Resolution::Fixed(FixedStep::TenSeconds),
            "30s" => Resolution::Fixed(FixedStep::ThirtySeconds),
            "1m" => Resolution::Fixed(FixedStep::OneMinute),
            "5m" => Resolution::Fixed(FixedStep::FiveMinutes),
            "15m" => Resolution::Fixed(FixedStep::FifteenMinutes),
            "1h" => Resolution::Fixed(FixedStep::OneHour),
            other => Resolution::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
            Resolution::Fixed(fixed) => fixed.as_str(),
            Resolution::Unrecognized(name) => name,
        }
    }

    /// Step size in milliseconds for a range of `range_ms`.
    pub fn step_ms(&self, range_ms: i64) -> i64 {
        // roughly how many buckets a tier splits the range into
        let factor = match self {
            Resolution::Fixed(fixed) => return fixed.millis(),
            Resolution::Low => 100,
            Resolution::Medium | Resolution::Unrecognized(_) => 250,
            Resolution::High => 750,
        };

        // floor to whole seconds, never below one second
        let whole_seconds = range_ms.div_euclid(factor).div_euclid(1000);
        (whole_seconds * 1000).max(MIN_STEP_MS)
    }
}

/// Step size in milliseconds for `resolution` over a `range_ms` window.
pub fn step(resolution: &Resolution, range_ms: i64) -> i64 {
    resolution.step_ms(range_ms)
}

impl From<&str> for Resolution {
    fn from(name: &str) -> Self {
        Resolution::parse(name)
    }
}

impl From<String> for Resolution {
    fn from(name: String) -> Self {
        Resolution::parse(&name)
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        resolution.as_str().to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
