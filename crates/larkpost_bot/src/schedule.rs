//! When the scheduler fires.
//!
//! Schedules are evaluated in an IANA timezone so "09:00" means 09:00 on the
//! wall clock of that zone, across DST changes.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use larkpost_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trait for schedule types that can compute their next fire time.
pub trait Schedule {
    /// Calculate the next execution time strictly after `after`.
    ///
    /// Returns `None` if the schedule has no future fire time.
    fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Longest accepted interval schedule (366 days).
pub const MAX_INTERVAL_SECS: u64 = 366 * 24 * 60 * 60;

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Types of publish schedules.
///
/// ```toml
/// [schedule]
/// type = "daily"
/// hour = 9
/// minute = 0
/// timezone = "America/New_York"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleType {
    /// Once a day at a wall-clock time
    Daily {
        /// Hour of day (0-23)
        hour: u32,
        /// Minute of hour (0-59)
        #[serde(default)]
        minute: u32,
        /// IANA timezone name
        #[serde(default = "default_timezone")]
        timezone: String,
    },

    /// Cron expression (6 or 7 fields: sec min hour day month weekday [year])
    ///
    /// Example: "0 0 9 * * Mon-Fri" = 9 AM on weekdays
    Cron {
        /// Cron expression string
        expression: String,
        /// IANA timezone name
        #[serde(default = "default_timezone")]
        timezone: String,
    },

    /// Fixed interval in seconds
    Interval {
        /// Interval duration in seconds
        seconds: u64,
    },
}

impl Default for ScheduleType {
    fn default() -> Self {
        ScheduleType::Daily {
            hour: 9,
            minute: 0,
            timezone: default_timezone(),
        }
    }
}

fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    Tz::from_str(name).map_err(|e| ConfigError::new(format!("Invalid timezone '{}': {}", name, e)))
}

impl ScheduleType {
    /// Check field ranges, timezone names and cron syntax.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ScheduleType::Daily {
                hour,
                minute,
                timezone,
            } => {
                if *hour > 23 || *minute > 59 {
                    return Err(ConfigError::new(format!(
                        "Invalid daily time {:02}:{:02}",
                        hour, minute
                    )));
                }
                parse_timezone(timezone)?;
            }
            ScheduleType::Cron {
                expression,
                timezone,
            } => {
                cron::Schedule::from_str(expression).map_err(|e| {
                    ConfigError::new(format!("Invalid cron expression '{}': {}", expression, e))
                })?;
                parse_timezone(timezone)?;
            }
            ScheduleType::Interval { seconds } => {
                if *seconds == 0 {
                    return Err(ConfigError::new("Schedule interval must be positive"));
                }
                if *seconds > MAX_INTERVAL_SECS {
                    return Err(ConfigError::new(format!(
                        "Schedule interval {}s exceeds the maximum of {}s",
                        seconds, MAX_INTERVAL_SECS
                    )));
                }
            }
        }
        Ok(())
    }
}

/// First instant of `date` at `hour:minute` local time that is after `after`.
fn daily_candidate(
    tz: &Tz,
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    // Times inside a DST gap resolve to the first valid minute after it.
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())?;
    Some(local.with_timezone(&Utc))
}

impl Schedule for ScheduleType {
    fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ScheduleType::Daily {
                hour,
                minute,
                timezone,
            } => {
                let tz = parse_timezone(timezone).ok()?;
                let mut date = after.with_timezone(&tz).date_naive();
                for _ in 0..3 {
                    match daily_candidate(&tz, date, *hour, *minute) {
                        Some(candidate) if candidate > after => return Some(candidate),
                        _ => {}
                    }
                    date = date.succ_opt()?;
                }
                None
            }
            ScheduleType::Cron {
                expression,
                timezone,
            } => {
                let tz = parse_timezone(timezone).ok()?;
                let schedule = cron::Schedule::from_str(expression).ok()?;
                schedule
                    .after(&after.with_timezone(&tz))
                    .next()
                    .map(|next| next.with_timezone(&Utc))
            }
            ScheduleType::Interval { seconds } => {
                let seconds = i64::try_from(*seconds).ok()?;
                after.checked_add_signed(Duration::try_seconds(seconds)?)
            }
        }
    }
}
