use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::queue::Countdown;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Delivery date and time are stored as naive values already in the kitchen's local time.
pub fn delivery_instant(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

pub fn compute_countdown(delivery_at: NaiveDateTime, now: NaiveDateTime) -> Countdown {
    let millis = (delivery_at - now).num_milliseconds();
    // floor, so 30 seconds late already reads as -1
    let minutes_remaining = millis.div_euclid(MILLIS_PER_MINUTE);
    let hours = minutes_remaining.div_euclid(60);
    let minutes = minutes_remaining % 60;

    Countdown {
        delivery_at,
        minutes_remaining,
        hours,
        minutes,
        formatted: format_remaining(hours, minutes),
    }
}

pub fn format_remaining(hours: i64, minutes: i64) -> String {
    if hours < 0 || minutes < 0 {
        "Overdue".to_string()
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{compute_countdown, delivery_instant, format_remaining};
    use crate::models::fixtures::at;

    #[test]
    fn fifteen_minutes_ahead() {
        let delivery_at = delivery_instant(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        );
        let countdown = compute_countdown(delivery_at, at("2024-01-10T09:00:00"));

        assert_eq!(countdown.minutes_remaining, 15);
        assert_eq!(countdown.hours, 0);
        assert_eq!(countdown.minutes, 15);
        assert_eq!(countdown.formatted, "15m");
    }

    #[test]
    fn twenty_minutes_late_is_overdue() {
        let countdown = compute_countdown(at("2024-01-10T09:00:00"), at("2024-01-10T09:20:00"));

        assert_eq!(countdown.minutes_remaining, -20);
        assert_eq!(countdown.formatted, "Overdue");
    }

    #[test]
    fn partial_minutes_round_down() {
        let ahead = compute_countdown(at("2024-01-10T10:00:00"), at("2024-01-10T09:58:30"));
        assert_eq!(ahead.minutes_remaining, 1);

        let late = compute_countdown(at("2024-01-10T10:00:00"), at("2024-01-10T10:00:30"));
        assert_eq!(late.minutes_remaining, -1);
        assert_eq!(late.formatted, "Overdue");
    }

    #[test]
    fn long_countdowns_show_hours() {
        let countdown = compute_countdown(at("2024-01-10T13:05:00"), at("2024-01-10T10:00:00"));

        assert_eq!(countdown.minutes_remaining, 185);
        assert_eq!(countdown.formatted, "3h 5m");
    }

    #[test]
    fn exactly_one_hour_late_is_overdue() {
        let countdown = compute_countdown(at("2024-01-10T09:00:00"), at("2024-01-10T10:00:00"));

        assert_eq!(countdown.hours, -1);
        assert_eq!(countdown.minutes, 0);
        assert_eq!(countdown.formatted, "Overdue");
    }

    #[test]
    fn due_now_reads_zero_minutes() {
        assert_eq!(format_remaining(0, 0), "0m");
    }
}
