use crate::models::queue::AlertLevel;

const CRITICAL_MINUTES: i64 = 20;
const WARNING_MINUTES: i64 = 60;
const INFO_MINUTES: i64 = 180;

/// Overdue orders stay critical.
pub fn classify_alert(minutes_remaining: i64) -> AlertLevel {
    if minutes_remaining <= CRITICAL_MINUTES {
        AlertLevel::Critical
    } else if minutes_remaining <= WARNING_MINUTES {
        AlertLevel::Warning
    } else if minutes_remaining <= INFO_MINUTES {
        AlertLevel::Info
    } else {
        AlertLevel::None
    }
}
