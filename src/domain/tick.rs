// Axis tick labelling - suppresses repeated labels along a time axis
use crate::domain::interval::{Interval, IntervalClass};
use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc};
use serde::Deserialize;
use std::str::FromStr;

/// Time zone tick labels are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TickZone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

#[derive(Debug, thiserror::Error)]
#[error("invalid tick zone {0:?}: expected \"local\", \"utc\" or an offset like \"+02:00\"")]
pub struct InvalidTickZone(String);

impl FromStr for TickZone {
    type Err = InvalidTickZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "local" | "Local" => Ok(TickZone::Local),
            "utc" | "UTC" | "Z" => Ok(TickZone::Utc),
            offset => offset
                .parse::<FixedOffset>()
                .map(TickZone::Fixed)
                .map_err(|_| InvalidTickZone(s.to_string())),
        }
    }
}

impl TryFrom<String> for TickZone {
    type Error = InvalidTickZone;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

struct CalendarFields {
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CalendarFields {
    fn from(date: DateTime<Tz>) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
            hour: date.hour(),
            minute: date.minute(),
        }
    }
}

impl TickZone {
    fn calendar(&self, millis: i64) -> Option<CalendarFields> {
        match self {
            TickZone::Local => Local.timestamp_millis_opt(millis).single().map(Into::into),
            TickZone::Utc => Utc.timestamp_millis_opt(millis).single().map(Into::into),
            TickZone::Fixed(offset) => offset.timestamp_millis_opt(millis).single().map(Into::into),
        }
    }
}

/// Labels ticks for one axis render pass.
///
/// A label identical to the previously emitted one comes back as an empty
/// string, so the formatter must be fed timestamps in axis order and a new
/// formatter must be built for every pass.
#[derive(Debug, Clone)]
pub struct TickFormatter {
    class: IntervalClass,
    zone: TickZone,
    previous_label: Option<String>,
}

impl TickFormatter {
    pub fn new(interval: &Interval, zone: TickZone) -> Self {
        Self {
            class: interval.class(),
            zone,
            previous_label: None,
        }
    }

    /// Label for `timestamp` (UNIX seconds), or `""` when it repeats the last one.
    pub fn format(&mut self, timestamp: f64) -> String {
        let label = self.label(timestamp);

        if self.previous_label.as_deref() == Some(label.as_str()) {
            return String::new();
        }

        self.previous_label = Some(label.clone());
        label
    }

    /// Label every timestamp in order with a fresh formatter.
    pub fn label_all<I>(interval: &Interval, zone: TickZone, timestamps: I) -> Vec<String>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut formatter = Self::new(interval, zone);
        timestamps.into_iter().map(|ts| formatter.format(ts)).collect()
    }

    fn label(&self, timestamp: f64) -> String {
        if !timestamp.is_finite() {
            return String::new();
        }

        let millis = (timestamp * 1000.0).trunc() as i64;
        let Some(date) = self.zone.calendar(millis) else {
            return String::new();
        };

        match self.class {
            IntervalClass::Clock => format!("{}:{:02}", date.hour, date.minute),
            IntervalClass::Hourly => format!("{}:00", date.hour),
            IntervalClass::Calendar => format!("{}/{}", date.month, date.day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-10-26T10:30:00Z
    const MORNING: f64 = 1_698_316_200.0;

    #[test]
    fn test_clock_labels() {
        let mut formatter = TickFormatter::new(&Interval::TwentyFourHours, TickZone::Utc);
        assert_eq!(formatter.format(MORNING), "10:30");
        assert_eq!(formatter.format(MORNING + 29.0), "");
        assert_eq!(formatter.format(MORNING + 60.0), "10:31");
        assert_eq!(formatter.format(MORNING - 10.0 * 3600.0 + 300.0), "0:35");
    }

    #[test]
    fn test_hourly_labels() {
        let mut formatter = TickFormatter::new(&Interval::Today, TickZone::Utc);
        assert_eq!(formatter.format(MORNING), "10:00");
        assert_eq!(formatter.format(MORNING + 600.0), "");
        assert_eq!(formatter.format(MORNING + 1800.0), "11:00");
    }

    #[test]
    fn test_calendar_labels() {
        let mut formatter = TickFormatter::new(&Interval::LastWeek, TickZone::Utc);
        assert_eq!(formatter.format(MORNING), "10/26");
        assert_eq!(formatter.format(MORNING + 3600.0), "");
        assert_eq!(formatter.format(MORNING + 86_400.0), "10/27");
        assert_eq!(formatter.format(MORNING + 6.0 * 86_400.0), "11/1");
    }

    #[test]
    fn test_unrecognized_interval_uses_clock_labels() {
        let mut formatter = TickFormatter::new(&Interval::parse("bogus"), TickZone::Utc);
        assert_eq!(formatter.format(MORNING + 120.0), "10:32");
    }

    #[test]
    fn test_suppression_is_per_instance() {
        let interval = Interval::TwentyFourHours;
        let mut first = TickFormatter::new(&interval, TickZone::Utc);
        assert_eq!(first.format(MORNING), "10:30");
        assert_eq!(first.format(MORNING + 1.0), "");

        // replaying on the same instance suppresses the repeat
        assert_eq!(first.format(MORNING), "");

        let mut second = TickFormatter::new(&interval, TickZone::Utc);
        assert_eq!(second.format(MORNING), "10:30");
        assert_eq!(second.format(MORNING + 1.0), "");
    }

    #[test]
    fn test_label_changes_reemit_previous_values() {
        let labels = TickFormatter::label_all(
            &Interval::OneHour,
            TickZone::Utc,
            [MORNING, MORNING + 60.0, MORNING],
        );
        assert_eq!(labels, vec!["10:30", "10:31", "10:30"]);
    }

    #[test]
    fn test_fixed_offset_zone() {
        let zone: TickZone = "+02:00".parse().unwrap();
        let mut formatter = TickFormatter::new(&Interval::SixHours, zone);
        assert_eq!(formatter.format(MORNING), "12:30");

        let zone: TickZone = "-11:00".parse().unwrap();
        let mut formatter = TickFormatter::new(&Interval::SevenDays, zone);
        assert_eq!(formatter.format(MORNING), "10/25");
    }

    #[test]
    fn test_zone_parsing() {
        assert_eq!("utc".parse::<TickZone>().unwrap(), TickZone::Utc);
        assert_eq!("local".parse::<TickZone>().unwrap(), TickZone::Local);
        assert!("mars/olympus".parse::<TickZone>().is_err());
    }

    #[test]
    fn test_non_finite_timestamps_are_blank() {
        let mut formatter = TickFormatter::new(&Interval::OneHour, TickZone::Utc);
        assert_eq!(formatter.format(f64::NAN), "");
        assert_eq!(formatter.format(MORNING), "10:30");
    }
}
