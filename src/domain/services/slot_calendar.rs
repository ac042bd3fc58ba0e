use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;

use crate::error::AppError;

const MINUTES_PER_DAY: u32 = 1440;

/// Ordered slot labels ("HH:MM") making up one business day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSchedule {
    labels: Vec<String>,
}

impl SlotSchedule {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Builds labels from `start` up to (excluding) `end` every `interval_min` minutes.
    pub fn from_hours(start: &str, end: &str, interval_min: u32) -> Result<Self, AppError> {
        let start = parse_label(start)?;
        let end = parse_label(end)?;

        if interval_min == 0 || interval_min > MINUTES_PER_DAY {
            return Err(AppError::Validation("Slot interval must be between 1 and 1440 minutes".into()));
        }
        if end <= start {
            return Err(AppError::Validation("Business hours must end after they start".into()));
        }

        let start_idx = start.hour() * 60 + start.minute();
        let end_idx = end.hour() * 60 + end.minute();

        let labels = (start_idx..end_idx)
            .step_by(interval_min as usize)
            .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
            .collect();

        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        // 09:00 .. 17:30, half-hourly
        let labels = (18..36)
            .map(|half_hours: u32| format!("{:02}:{:02}", half_hours / 2, (half_hours % 2) * 30))
            .collect();
        Self { labels }
    }
}

/// Validates a "HH:MM" slot label.
pub fn parse_label(label: &str) -> Result<NaiveTime, AppError> {
    if label.len() != 5 {
        return Err(AppError::Validation("Invalid time format (HH:MM)".into()));
    }
    NaiveTime::parse_from_str(label, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))
}

/// Schedule labels not held by a confirmed appointment, in schedule order.
pub fn available_slots(schedule: &SlotSchedule, confirmed_times: &[String]) -> Vec<String> {
    let booked: HashSet<&str> = confirmed_times.iter().map(String::as_str).collect();

    schedule
        .labels()
        .iter()
        .filter(|label| !booked.contains(label.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_bookings_returns_full_schedule() {
        let schedule = SlotSchedule::new(labels(&["09:00", "09:30", "10:00"]));
        assert_eq!(available_slots(&schedule, &[]), schedule.labels().to_vec());
    }

    #[test]
    fn test_confirmed_slot_is_removed() {
        let schedule = SlotSchedule::new(labels(&["09:00", "09:30"]));
        let free = available_slots(&schedule, &labels(&["09:00"]));
        assert_eq!(free, labels(&["09:30"]));
    }

    #[test]
    fn test_unknown_booked_label_is_ignored() {
        let schedule = SlotSchedule::new(labels(&["09:00", "09:30"]));
        let free = available_slots(&schedule, &labels(&["07:15"]));
        assert_eq!(free, labels(&["09:00", "09:30"]));
    }

    #[test]
    fn test_from_hours_half_hourly() {
        let schedule = SlotSchedule::from_hours("09:00", "11:00", 30).unwrap();
        assert_eq!(schedule.labels(), labels(&["09:00", "09:30", "10:00", "10:30"]).as_slice());
        assert!(schedule.contains("10:30"));
        assert!(!schedule.contains("11:00"));
    }

    #[test]
    fn test_default_matches_business_hours() {
        assert_eq!(SlotSchedule::default(), SlotSchedule::from_hours("09:00", "18:00", 30).unwrap());
        assert_eq!(SlotSchedule::default().labels().first().map(String::as_str), Some("09:00"));
        assert_eq!(SlotSchedule::default().labels().last().map(String::as_str), Some("17:30"));
    }

    #[test]
    fn test_from_hours_rejects_bad_input() {
        assert!(SlotSchedule::from_hours("10:00", "09:00", 30).is_err());
        assert!(SlotSchedule::from_hours("09:00", "18:00", 0).is_err());
        assert!(SlotSchedule::from_hours("9am", "18:00", 30).is_err());
    }

    #[test]
    fn test_parse_label_requires_zero_padding() {
        assert!(parse_label("09:30").is_ok());
        assert!(parse_label("9:30").is_err());
        assert!(parse_label("24:00").is_err());
    }
}
