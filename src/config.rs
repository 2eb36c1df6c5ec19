use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub dashboard: DashboardTimings,
}

/// Intervals driving a dashboard session, plus the snooze window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardTimings {
    pub refresh: Duration,
    pub clock_tick: Duration,
    pub alert_check: Duration,
    pub snooze_window: Duration,
}

impl Default for DashboardTimings {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(60),
            clock_tick: Duration::from_secs(1),
            alert_check: Duration::from_secs(15),
            snooze_window: Duration::from_secs(5 * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let defaults = DashboardTimings::default();
        let dashboard = DashboardTimings {
            refresh: seconds_or_default("QUEUE_REFRESH_SECS", defaults.refresh)?,
            clock_tick: seconds_or_default("CLOCK_TICK_SECS", defaults.clock_tick)?,
            alert_check: seconds_or_default("ALERT_CHECK_SECS", defaults.alert_check)?,
            snooze_window: seconds_or_default("SNOOZE_WINDOW_SECS", defaults.snooze_window)?,
        };

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            dashboard,
        })
    }
}

fn seconds_or_default(key: &str, default: Duration) -> Result<Duration, AppError> {
    let secs: u64 = parse_or_default(key, default.as_secs())?;
    if secs == 0 {
        return Err(AppError::Internal(format!("invalid {key}: must be > 0")));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::DashboardTimings;

    #[test]
    fn default_timings_match_reference_intervals() {
        let timings = DashboardTimings::default();

        assert_eq!(timings.refresh, Duration::from_secs(60));
        assert_eq!(timings.clock_tick, Duration::from_secs(1));
        assert_eq!(timings.alert_check, Duration::from_secs(15));
        assert_eq!(timings.snooze_window, Duration::from_secs(300));
    }
}
