// Interval domain model - symbolic time ranges and the windows they cover
use serde::{Deserialize, Serialize};
use std::fmt;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// A named time range selectable from the chart menu.
///
/// Anything that is not one of the known names is kept as `Unrecognized` so it
/// can still be resolved and formatted with the ten minute fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Interval {
    TenMinutes,
    ThirtyMinutes,
    OneHour,
    ThreeHours,
    SixHours,
    TwelveHours,
    TwentyFourHours,
    FortyEightHours,
    Today,
    Yesterday,
    Week,
    LastWeek,
    SevenDays,
    FourteenDays,
    Unrecognized(String),
}

/// How tick labels are laid out for an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalClass {
    /// `H:MM`
    Clock,
    /// `H:00`
    Hourly,
    /// `M/D`
    Calendar,
}

/// A concrete `[from, to]` range in UNIX seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn range_ms(&self) -> i64 {
        (self.to - self.from) * 1000
    }
}

impl Interval {
    /// Every selectable interval in menu order, paired with its display label.
    pub const MENU: [(Interval, &'static str); 14] = [
        (Interval::TenMinutes, "10 minutes"),
        (Interval::ThirtyMinutes, "30 minutes"),
        (Interval::OneHour, "1 hour"),
        (Interval::ThreeHours, "3 hours"),
        (Interval::SixHours, "6 hours"),
        (Interval::TwelveHours, "12 hours"),
        (Interval::TwentyFourHours, "24 hours"),
        (Interval::FortyEightHours, "48 hours"),
        (Interval::Today, "Today"),
        (Interval::Yesterday, "Yesterday"),
        (Interval::Week, "Week"),
        (Interval::LastWeek, "Last week"),
        (Interval::SevenDays, "7 days"),
        (Interval::FourteenDays, "14 days"),
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "10m" => Interval::TenMinutes,
            "30m" => Interval::ThirtyMinutes,
            "1h" => Interval::OneHour,
            "3h" => Interval::ThreeHours,
            "6h" => Interval::SixHours,
            "12h" => Interval::TwelveHours,
            "24h" => Interval::TwentyFourHours,
            "48h" => Interval::FortyEightHours,
            "today" => Interval::Today,
            "yesterday" => Interval::Yesterday,
            "week" => Interval::Week,
            "lastweek" => Interval::LastWeek,
            "7d" => Interval::SevenDays,
            "14d" => Interval::FourteenDays,
            other => Interval::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Interval::TenMinutes => "10m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::ThreeHours => "3h",
            Interval::SixHours => "6h",
            Interval::TwelveHours => "12h",
            Interval::TwentyFourHours => "24h",
            Interval::FortyEightHours => "48h",
            Interval::Today => "today",
            Interval::Yesterday => "yesterday",
            Interval::Week => "week",
            Interval::LastWeek => "lastweek",
            Interval::SevenDays => "7d",
            Interval::FourteenDays => "14d",
            Interval::Unrecognized(name) => name,
        }
    }

    pub fn class(&self) -> IntervalClass {
        match self {
            Interval::Today | Interval::Yesterday => IntervalClass::Hourly,
            Interval::Week | Interval::LastWeek | Interval::SevenDays | Interval::FourteenDays => {
                IntervalClass::Calendar
            }
            _ => IntervalClass::Clock,
        }
    }

    /// Window covered by this interval relative to `now` (UNIX seconds).
    ///
    /// `today` and `yesterday` are aligned on UTC day boundaries.
    pub fn window(&self, now: i64) -> TimeWindow {
        let start_of_day = now - now.rem_euclid(DAY);

        match self {
            Interval::TenMinutes => TimeWindow::new(now - 10 * MINUTE, now),
            Interval::ThirtyMinutes => TimeWindow::new(now - 30 * MINUTE, now),
            Interval::OneHour => TimeWindow::new(now - HOUR, now),
            Interval::ThreeHours => TimeWindow::new(now - 3 * HOUR, now),
            Interval::SixHours => TimeWindow::new(now - 6 * HOUR, now),
            Interval::TwelveHours => TimeWindow::new(now - 12 * HOUR, now),
            Interval::TwentyFourHours => TimeWindow::new(now - DAY, now),
            Interval::FortyEightHours => TimeWindow::new(now - 2 * DAY, now),
            Interval::Today => TimeWindow::new(start_of_day, now),
            Interval::Yesterday => TimeWindow::new(start_of_day - DAY, start_of_day),
            Interval::Week | Interval::SevenDays => TimeWindow::new(now - 7 * DAY, now),
            Interval::LastWeek => TimeWindow::new(now - 14 * DAY, now - 7 * DAY),
            Interval::FourteenDays => TimeWindow::new(now - 14 * DAY, now),
            Interval::Unrecognized(_) => TimeWindow::new(now - 10 * MINUTE, now),
        }
    }
}

/// Resolve a named interval into a concrete window ending at (or before) `now`.
pub fn resolve(interval: &Interval, now: i64) -> TimeWindow {
    interval.window(now)
}

impl From<&str> for Interval {
    fn from(name: &str) -> Self {
        Interval::parse(name)
    }
}

impl From<String> for Interval {
    fn from(name: String) -> Self {
        Interval::parse(&name)
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
