use chrono::{DateTime, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ScheduleError;

/// The fixed daily bands, 7:30 AM to 7:30 PM in 90-minute steps
pub const TIME_SLOTS: [&str; 8] = [
    "7:30 AM-9:00 AM",
    "9:00 AM-10:30 AM",
    "10:30 AM-12:00 PM",
    "12:00 PM-1:30 PM",
    "1:30 PM-3:00 PM",
    "3:00 PM-4:30 PM",
    "4:30 PM-6:00 PM",
    "6:00 PM-7:30 PM",
];

/// One of the fixed time bands of a day, stored as its position in [`TIME_SLOTS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u8);

impl TimeSlot {
    /// All slots in display order
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..TIME_SLOTS.len() as u8).map(TimeSlot)
    }

    /// Looks up a slot by its label, ignoring surrounding whitespace
    pub fn from_label(label: &str) -> Option<TimeSlot> {
        let clean = label.trim();
        TIME_SLOTS
            .iter()
            .position(|s| *s == clean)
            .map(|i| TimeSlot(i as u8))
    }

    pub fn parse(label: &str) -> Result<TimeSlot, ScheduleError> {
        Self::from_label(label).ok_or_else(|| ScheduleError::UnknownSlot(label.to_string()))
    }

    pub fn label(self) -> &'static str {
        TIME_SLOTS[self.0 as usize]
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Reads a calendar day in any of the forms a date picker hands over
/// (`2025-06-02`, `2025/06/02`, `06/02/2025`, or a full RFC 3339 timestamp)
pub fn parse_day(input: &str) -> Result<NaiveDate, ScheduleError> {
    let clean = input.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(clean, format) {
            return Ok(day);
        }
    }

    // Timestamps keep their local calendar day
    if let Ok(ts) = DateTime::parse_from_rfc3339(clean) {
        return Ok(ts.date_naive());
    }

    Err(ScheduleError::InvalidDate {
        input: input.to_string(),
    })
}

/// Canonical `YYYY-MM-DD` form of a day
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
