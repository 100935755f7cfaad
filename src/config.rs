use std::env;

use chrono::{FixedOffset, Offset, Utc};
use chrono_tz::Tz;

use crate::{clock::ReportingZone, error::ReporterError};

pub const TIMEZONE_VAR: &str = "TIME_OF_DAY_TIMEZONE";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Zone in which "time of day" is measured. UTC unless overridden.
    pub zone: ReportingZone,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            zone: ReportingZone::Fixed(Utc.fix()),
        }
    }
}

/// Accepts `Z`, `UTC`, a fixed offset such as `+09:00`, or an IANA zone name.
pub fn parse_reporting_zone(value: &str) -> Result<ReportingZone, ReporterError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(ReportingZone::Fixed(Utc.fix()));
    }
    if value.starts_with('+') || value.starts_with('-') {
        return value
            .parse::<FixedOffset>()
            .map(ReportingZone::Fixed)
            .map_err(|err| {
                ReporterError::Config(format!("{}={:?}: {}", TIMEZONE_VAR, value, err))
            });
    }
    value
        .parse::<Tz>()
        .map(ReportingZone::Named)
        .map_err(|err| ReporterError::Config(format!("{}={:?}: {}", TIMEZONE_VAR, value, err)))
}

impl Config {
    pub fn from_env() -> Result<Self, ReporterError> {
        match env::var(TIMEZONE_VAR) {
            Ok(value) if !value.trim().is_empty() => Ok(Config {
                zone: parse_reporting_zone(&value)?,
            }),
            _ => Ok(Config::default()),
        }
    }
}
