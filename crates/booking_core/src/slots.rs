//! crates/booking_core/src/slots.rs
//!
//! Half-hour slot generation for a doctor's booking window.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::domain::Slot;
use crate::ports::{PortError, PortResult};

/// First bookable hour of the day (inclusive).
pub const OPENING_HOUR: u32 = 10;
/// Hour the booking window closes (exclusive).
pub const CLOSING_HOUR: u32 = 21;
pub const SLOT_MINUTES: u32 = 30;

const LABEL_FORMAT: &str = "%I:%M %p";

/// The display label for a slot starting at `time`, e.g. `"01:30 PM"`.
pub fn slot_label(time: NaiveTime) -> String {
    time.format(LABEL_FORMAT).to_string()
}

/// Every slot start time in the window, in order.
pub fn window_times() -> impl Iterator<Item = NaiveTime> {
    (OPENING_HOUR..CLOSING_HOUR).flat_map(|hour| {
        (0..60)
            .step_by(SLOT_MINUTES as usize)
            .filter_map(move |minute| NaiveTime::from_hms_opt(hour, minute, 0))
    })
}

/// Parses a slot label and checks it names a slot inside the booking window.
pub fn parse_slot_label(label: &str) -> PortResult<NaiveTime> {
    let invalid = || PortError::BadRequest(format!("'{}' is not a bookable time slot", label));

    let time = NaiveTime::parse_from_str(label.trim(), LABEL_FORMAT).map_err(|_| invalid())?;
    let in_window = (OPENING_HOUR..CLOSING_HOUR).contains(&time.hour())
        && time.minute() % SLOT_MINUTES == 0
        && time.second() == 0;

    if in_window {
        Ok(time)
    } else {
        Err(invalid())
    }
}

/// Derives the open slots on `date`.
///
/// Slots whose label appears in `booked` are skipped. When `date` is the day of
/// `now`, slots at or before `now` are skipped too.
pub fn generate_slots(date: NaiveDate, now: NaiveDateTime, booked: &[String]) -> Vec<Slot> {
    let is_today = date == now.date();

    window_times()
        .map(|time| (slot_label(time), date.and_time(time)))
        .filter(|(_, datetime)| !(is_today && *datetime <= now))
        .filter(|(label, _)| !booked.iter().any(|b| b == label))
        .map(|(time, datetime)| Slot { time, datetime })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn future_day_has_full_window() {
        let today = day(2025, 1, 1);
        let slots = generate_slots(day(2025, 1, 2), at(today, 9, 0), &[]);

        assert_eq!(slots.len(), 22);
        assert_eq!(slots.first().unwrap().time, "10:00 AM");
        assert_eq!(slots.last().unwrap().time, "08:30 PM");
        assert_eq!(slots[1].datetime, at(day(2025, 1, 2), 10, 30));
    }

    #[test]
    fn booked_labels_are_excluded() {
        let booked = vec!["10:00 AM".to_string(), "01:30 PM".to_string()];
        let slots = generate_slots(day(2025, 1, 2), at(day(2025, 1, 1), 9, 0), &booked);

        assert_eq!(slots.len(), 20);
        assert!(slots.iter().all(|s| !booked.contains(&s.time)));
    }

    #[test]
    fn past_slots_today_are_skipped() {
        let today = day(2025, 1, 2);
        let slots = generate_slots(today, at(today, 12, 0), &[]);

        // 12:00 itself is not bookable; the first open slot is 12:30.
        assert_eq!(slots.first().unwrap().time, "12:30 PM");
        assert_eq!(slots.len(), 17);
    }

    #[test]
    fn nothing_left_after_closing() {
        let today = day(2025, 1, 2);
        assert!(generate_slots(today, at(today, 21, 0), &[]).is_empty());
    }

    #[test]
    fn past_days_are_not_filtered_by_clock() {
        let slots = generate_slots(day(2025, 1, 1), at(day(2025, 1, 2), 23, 0), &[]);
        assert_eq!(slots.len(), 22);
    }

    #[rstest]
    #[case("10:00 AM", true)]
    #[case("08:30 PM", true)]
    #[case("09:00 PM", false)]
    #[case("09:30 AM", false)]
    #[case("10:15 AM", false)]
    #[case("ten o'clock", false)]
    fn label_validation(#[case] label: &str, #[case] ok: bool) {
        assert_eq!(parse_slot_label(label).is_ok(), ok);
    }

    #[test]
    fn every_generated_label_parses_back() {
        for time in window_times() {
            assert_eq!(parse_slot_label(&slot_label(time)).unwrap(), time);
        }
    }
}
