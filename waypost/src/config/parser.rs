//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields. Starts from `ConfigFile::default()` and overlays any values
//! found in the file.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("tracking")) {
        if let Some(v) = section.get("interval_secs") {
            config.tracking.interval_secs =
                parse_value("tracking", "interval_secs", v, "must be a whole number of seconds")?;
        }
        if let Some(v) = section.get("fastest_interval_secs") {
            config.tracking.fastest_interval_secs = parse_value(
                "tracking",
                "fastest_interval_secs",
                v,
                "must be a whole number of seconds",
            )?;
        }
        if let Some(v) = section.get("near_threshold_meters") {
            let threshold: f64 = parse_value(
                "tracking",
                "near_threshold_meters",
                v,
                "must be a distance in meters",
            )?;
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(invalid(
                    "tracking",
                    "near_threshold_meters",
                    v,
                    "must be a positive distance in meters",
                ));
            }
            config.tracking.near_threshold_meters = threshold;
        }
        if let Some(v) = section.get("max_statuses") {
            let max: usize =
                parse_value("tracking", "max_statuses", v, "must be a positive count")?;
            if max == 0 {
                return Err(invalid("tracking", "max_statuses", v, "must be at least 1"));
            }
            config.tracking.max_statuses = max;
        }
        if let Some(v) = section.get("is_tracked") {
            config.tracking.is_tracked =
                parse_value("tracking", "is_tracked", v, "must be true or false")?;
        }
    }

    if let Some(section) = ini.section(Some("sleep")) {
        if let Some(v) = section.get("start_hour") {
            let hour: u32 = parse_value("sleep", "start_hour", v, "must be an hour (0-23)")?;
            if hour > 23 {
                return Err(invalid("sleep", "start_hour", v, "must be an hour (0-23)"));
            }
            config.sleep.start_hour = hour;
        }
        if let Some(v) = section.get("duration_hours") {
            config.sleep.duration_hours =
                parse_value("sleep", "duration_hours", v, "must be a whole number of hours")?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("status_log") {
            config.logging.status_log =
                parse_value("logging", "status_log", v, "must be true or false")?;
        }
        if let Some(v) = section.get("status_log_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.status_log_path = expand_tilde(v);
            }
        }
    }

    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("udp_port") {
            config.source.udp_port =
                parse_value("source", "udp_port", v, "must be a UDP port number")?;
        }
    }

    Ok(config)
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
