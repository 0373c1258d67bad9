use crate::domain::models::activity::{Activity, DateWindow};
use crate::domain::models::booking::Booking;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub time_slot: String,
    pub remaining_places: i32,
    pub total_places: i32,
}

/// Lazy sequence of one-hour slot labels covering [start_hour, end_hour).
pub fn hour_slots(start_hour: u32, end_hour: u32) -> impl Iterator<Item = String> {
    (start_hour..end_hour).map(|hour| format!("{:02}:00-{:02}:00", hour, hour + 1))
}

/// Slots offered by a window. Only the hour components of the open/close
/// times count, so a window ending at "12:30" stops at the 11:00-12:00 slot.
pub fn window_slots(window: &DateWindow) -> impl Iterator<Item = String> {
    let start = parse_hour(&window.start_time).unwrap_or(0);
    let end = parse_hour(&window.end_time).unwrap_or(0);
    hour_slots(start, end)
}

/// Slots the activity offers on `date`; empty when the date has no window.
pub fn slots_for_date(activity: &Activity, date: NaiveDate) -> Vec<String> {
    match activity.window_for(date) {
        Some(window) => window_slots(window).collect(),
        None => Vec::new(),
    }
}

/// Capacity left in one slot given the confirmed bookings of its calendar
/// day. Negative only if the occupancy invariant was already broken.
pub fn remaining_places(total_places: i32, slot: &str, confirmed: &[Booking]) -> i32 {
    let booked: i64 = confirmed
        .iter()
        .filter(|b| b.time_slot == slot)
        .map(|b| b.number_of_places as i64)
        .sum();
    total_places - booked as i32
}

/// Per-slot availability for one date, in slot order.
pub fn slot_availability(activity: &Activity, date: NaiveDate, confirmed: &[Booking]) -> Vec<SlotAvailability> {
    slots_for_date(activity, date)
        .into_iter()
        .map(|slot| {
            let remaining = remaining_places(activity.total_places, &slot, confirmed);
            SlotAvailability {
                time_slot: slot,
                remaining_places: remaining,
                total_places: activity.total_places,
            }
        })
        .collect()
}

/// Hour component of a strict "HH:MM" window time. A two-digit hour up to
/// 24 and two-digit minutes up to 59 are required; anything else is
/// rejected.
pub fn parse_hour(time: &str) -> Option<u32> {
    let (hour, minutes) = time.split_once(':')?;
    if hour.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hour.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    (hour <= 24 && minutes <= 59).then_some(hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::activity::NewActivityParams;
    use crate::domain::models::booking::{BookingStatus, NewBookingParams};
    use chrono::Utc;

    fn window(date: &str, start: &str, end: &str) -> DateWindow {
        DateWindow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    fn activity(windows: Vec<DateWindow>, total_places: i32) -> Activity {
        Activity::new(NewActivityParams {
            name: "Kayak tour".into(),
            description: "Half-day kayak tour".into(),
            category: "water".into(),
            place: "Lake".into(),
            available_dates: windows,
            price: 25.0,
            total_places,
            created_by: "admin".into(),
        })
    }

    fn confirmed_booking(activity_id: &str, date: NaiveDate, slot: &str, places: i32) -> Booking {
        Booking::new(NewBookingParams {
            user_id: "u1".into(),
            activity_id: activity_id.into(),
            selected_date: date,
            time_slot: slot.into(),
            number_of_places: places,
            total_price: places as f64 * 25.0,
        })
    }

    #[test]
    fn generates_hourly_labels() {
        let slots: Vec<String> = hour_slots(9, 12).collect();
        assert_eq!(slots, vec!["09:00-10:00", "10:00-11:00", "11:00-12:00"]);
    }

    #[test]
    fn labels_are_zero_padded() {
        let slots: Vec<String> = hour_slots(8, 10).collect();
        assert_eq!(slots[0], "08:00-09:00");
    }

    #[test]
    fn empty_window_generates_nothing() {
        assert_eq!(hour_slots(9, 9).count(), 0);
    }

    #[test]
    fn partial_hour_end_truncates() {
        let slots: Vec<String> = window_slots(&window("2026-09-01", "09:00", "12:30")).collect();
        assert_eq!(slots, vec!["09:00-10:00", "10:00-11:00", "11:00-12:00"]);
    }

    #[test]
    fn parse_hour_requires_strict_hh_mm() {
        assert_eq!(parse_hour("09:00"), Some(9));
        assert_eq!(parse_hour("24:00"), Some(24));
        assert_eq!(parse_hour("09:30"), Some(9));
        assert_eq!(parse_hour("9"), None);
        assert_eq!(parse_hour("9:00"), None);
        assert_eq!(parse_hour("09:99"), None);
        assert_eq!(parse_hour("25:00"), None);
        assert_eq!(parse_hour("+9:00"), None);
        assert_eq!(parse_hour("morning"), None);
    }

    #[test]
    fn unoffered_date_yields_empty_sequence() {
        let act = activity(vec![window("2026-09-01", "09:00", "17:00")], 10);
        let other = NaiveDate::parse_from_str("2026-09-02", "%Y-%m-%d").unwrap();
        assert!(slots_for_date(&act, other).is_empty());
    }

    #[test]
    fn iterator_is_restartable() {
        let win = window("2026-09-01", "09:00", "11:00");
        let first: Vec<String> = window_slots(&win).collect();
        let second: Vec<String> = window_slots(&win).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn remaining_subtracts_confirmed_sum_per_slot() {
        let date = NaiveDate::parse_from_str("2026-09-01", "%Y-%m-%d").unwrap();
        let act = activity(vec![window("2026-09-01", "09:00", "12:00")], 10);
        let confirmed = vec![
            confirmed_booking(&act.id, date, "09:00-10:00", 6),
            confirmed_booking(&act.id, date, "09:00-10:00", 2),
            confirmed_booking(&act.id, date, "10:00-11:00", 3),
        ];

        let avail = slot_availability(&act, date, &confirmed);
        assert_eq!(
            avail,
            vec![
                SlotAvailability { time_slot: "09:00-10:00".into(), remaining_places: 2, total_places: 10 },
                SlotAvailability { time_slot: "10:00-11:00".into(), remaining_places: 7, total_places: 10 },
                SlotAvailability { time_slot: "11:00-12:00".into(), remaining_places: 10, total_places: 10 },
            ]
        );
    }

    #[test]
    fn remaining_can_go_negative_after_prior_violation() {
        let date = NaiveDate::parse_from_str("2026-09-01", "%Y-%m-%d").unwrap();
        let confirmed = vec![confirmed_booking("a1", date, "09:00-10:00", 12)];
        assert_eq!(remaining_places(10, "09:00-10:00", &confirmed), -2);
    }

    #[test]
    fn new_bookings_start_confirmed() {
        let date = NaiveDate::parse_from_str("2026-09-01", "%Y-%m-%d").unwrap();
        let booking = confirmed_booking("a1", date, "09:00-10:00", 2);
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }
}
