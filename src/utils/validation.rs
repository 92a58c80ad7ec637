use crate::utils::error::{BoardError, Result};
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> BoardError {
    BoardError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Resolves an IANA zone name such as `America/Toronto`.
pub fn validate_time_zone(field_name: &str, name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| invalid(field_name, name, format!("Unknown time zone: {}", e)))
}

/// Parses an `HH:MM` offset such as `09:30`.
pub fn parse_clock_offset(field_name: &str, value: &str) -> Result<TimeDelta> {
    let (hours, minutes) = value
        .trim()
        .split_once(':')
        .ok_or_else(|| invalid(field_name, value, "Expected HH:MM"))?;

    let hours: i64 = hours
        .parse()
        .map_err(|_| invalid(field_name, value, "Hours must be a whole number"))?;
    let minutes: i64 = minutes
        .parse()
        .map_err(|_| invalid(field_name, value, "Minutes must be a whole number"))?;

    validate_range(field_name, hours, 0, 23)?;
    validate_range(field_name, minutes, 0, 59)?;

    Ok(TimeDelta::hours(hours) + TimeDelta::minutes(minutes))
}

pub fn parse_clock_time(field_name: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| invalid(field_name, value, format!("Expected HH:MM: {}", e)))
}

pub fn parse_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| invalid(field_name, value, format!("Expected YYYY-MM-DD: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://example.com").is_ok());
        assert!(validate_url("endpoint", "http://example.com").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("rolling_window", 5, 1).is_ok());
        assert!(validate_positive_number("rolling_window", 0, 1).is_err());
    }

    #[test]
    fn test_validate_time_zone() {
        assert_eq!(
            validate_time_zone("time_zone", "America/Toronto").unwrap(),
            chrono_tz::America::Toronto
        );
        assert!(validate_time_zone("time_zone", "Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_parse_clock_offset() {
        assert_eq!(
            parse_clock_offset("offset", "09:30").unwrap(),
            TimeDelta::minutes(9 * 60 + 30)
        );
        assert!(parse_clock_offset("offset", "930").is_err());
        assert!(parse_clock_offset("offset", "09:75").is_err());
        assert!(parse_clock_offset("offset", "24:00").is_err());
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date("first_day", "2021-12-01").unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 1).unwrap()
        );
        assert!(parse_date("first_day", "12/01/2021").is_err());
        assert_eq!(
            parse_clock_time("release_time", "00:00").unwrap(),
            NaiveTime::MIN
        );
    }
}
