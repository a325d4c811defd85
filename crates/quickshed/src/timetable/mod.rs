//! Weekly timetable view-model, page controller and print rendering.
mod grid;
mod page;
mod print;

pub use grid::*;
pub use page::*;
pub use print::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time slot labels of the school day, in display order.
pub const TIME_SLOTS: [&str; 7] = [
    "09:00-09:50",
    "09:50-10:40",
    "10:50-11:40",
    "11:40-12:30",
    "01:15-02:05",
    "02:05-02:55",
    "03:05-04:00",
];

/// A teaching day. Ordering follows the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All teaching days in display order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a day name is not one of the teaching days.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day '{0}' (expected Monday to Friday)")]
pub struct UnknownDay(pub String);

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

/// Returns true if `label` is one of the fixed time slots.
pub fn is_time_slot(label: &str) -> bool {
    TIME_SLOTS.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parse_is_case_insensitive() {
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!(" FRIDAY ".parse::<Day>().unwrap(), Day::Friday);
        assert!("Saturday".parse::<Day>().is_err());
    }

    #[test]
    fn test_days_are_in_week_order() {
        let mut sorted = Day::ALL;
        sorted.sort();
        assert_eq!(sorted, Day::ALL);
    }

    #[test]
    fn test_time_slot_lookup() {
        assert!(is_time_slot("09:00-09:50"));
        assert!(!is_time_slot("09:00-10:00"));
    }
}
