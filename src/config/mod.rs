pub mod cli;
pub mod toml_config;

use crate::domain::services::{EventSettings, ForfeitTable, ReleaseCalendar, TrajectorySettings};
use crate::utils::error::{BoardError, Result};
use crate::utils::validation;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_TIME_ZONE: &str = "America/Toronto";
pub const DEFAULT_SECOND_RELEASE_OFFSET: &str = "09:30";

/// Event options as written by a user, before parsing.
#[derive(Debug, Clone, Default)]
pub struct EventOptions<'a> {
    pub year: i32,
    pub time_zone: Option<&'a str>,
    pub first_day: Option<&'a str>,
    pub release_time: Option<&'a str>,
    pub second_release_offset: Option<&'a str>,
}

impl EventOptions<'_> {
    pub fn calendar(&self) -> Result<ReleaseCalendar> {
        let zone = validation::validate_time_zone(
            "event.time_zone",
            self.time_zone.unwrap_or(DEFAULT_TIME_ZONE),
        )?;

        let first_day = match self.first_day {
            Some(date) => validation::parse_date("event.first_day", date)?,
            None => chrono::NaiveDate::from_ymd_opt(self.year, 12, 1).ok_or_else(|| {
                BoardError::InvalidConfigValueError {
                    field: "event.year".to_string(),
                    value: self.year.to_string(),
                    reason: "no such calendar year".to_string(),
                }
            })?,
        };

        let release_time = match self.release_time {
            Some(time) => validation::parse_clock_time("event.release_time", time)?,
            None => chrono::NaiveTime::MIN,
        };

        let offset = validation::parse_clock_offset(
            "event.second_release_offset",
            self.second_release_offset
                .unwrap_or(DEFAULT_SECOND_RELEASE_OFFSET),
        )?;

        Ok(ReleaseCalendar::new(zone, first_day, release_time, offset))
    }

    pub fn settings(
        &self,
        forfeits: ForfeitTable,
        excluded_members: Vec<String>,
        trajectory: TrajectorySettings,
    ) -> Result<EventSettings> {
        Ok(EventSettings {
            year: self.year,
            calendar: self.calendar()?,
            forfeits,
            excluded_members,
            trajectory,
        })
    }
}

/// Reads forfeits in their nested form, `{"name": {"13": {"2": true}}}`.
pub fn load_forfeits_file(path: &str) -> Result<ForfeitTable> {
    let content = std::fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&content)?;
    ForfeitTable::from_nested_json(&value)
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "starboard")]
#[command(about = "Scores a private puzzle leaderboard and renders standings and charts")]
pub struct CliConfig {
    #[arg(long, help = "Leaderboard JSON endpoint")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Mirror tried when the primary endpoint fails")]
    pub fallback_endpoint: Option<String>,

    #[arg(long, help = "Read the leaderboard from a local file instead")]
    pub input_file: Option<String>,

    #[arg(long, env = "STARBOARD_SESSION", hide_env_values = true)]
    pub session_cookie: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long)]
    pub bundle_name: Option<String>,

    #[arg(long, default_value = "2021")]
    pub year: i32,

    #[arg(long, default_value = DEFAULT_TIME_ZONE)]
    pub time_zone: String,

    #[arg(long, help = "First release date (YYYY-MM-DD), defaults to December 1")]
    pub first_day: Option<String>,

    #[arg(long, default_value = "00:00")]
    pub release_time: String,

    #[arg(long, default_value = DEFAULT_SECOND_RELEASE_OFFSET)]
    pub second_release_offset: String,

    #[arg(long, default_value = "5")]
    pub rolling_window: usize,

    #[arg(long, default_value = "0")]
    pub active_threshold: u32,

    #[arg(long, help = "JSON file of forfeited stars")]
    pub forfeits_file: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Member names left out of scoring")]
    pub exclude: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    fn event_options(&self) -> EventOptions<'_> {
        EventOptions {
            year: self.year,
            time_zone: Some(&self.time_zone),
            first_day: self.first_day.as_deref(),
            release_time: Some(&self.release_time),
            second_release_offset: Some(&self.second_release_offset),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn fallback_endpoint(&self) -> Option<&str> {
        self.fallback_endpoint.as_deref()
    }

    fn input_file(&self) -> Option<&str> {
        self.input_file.as_deref()
    }

    fn request_headers(&self) -> Vec<(String, String)> {
        self.session_cookie
            .iter()
            .map(|session| ("Cookie".to_string(), format!("session={}", session)))
            .collect()
    }

    fn request_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.timeout_seconds))
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn bundle_name(&self) -> String {
        self.bundle_name
            .clone()
            .unwrap_or_else(|| format!("leaderboard-{}.zip", self.year))
    }

    fn event_settings(&self) -> Result<EventSettings> {
        let forfeits = match &self.forfeits_file {
            Some(path) => load_forfeits_file(path)?,
            None => ForfeitTable::new(),
        };
        self.event_options().settings(
            forfeits,
            self.exclude.clone(),
            TrajectorySettings {
                rolling_window: self.rolling_window,
                active_score_threshold: self.active_threshold,
            },
        )
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.input_file.is_none() && self.endpoint.is_none() {
            return Err(BoardError::MissingConfigError {
                field: "endpoint or input_file".to_string(),
            });
        }
        if let Some(endpoint) = &self.endpoint {
            validation::validate_url("endpoint", endpoint)?;
        }
        if let Some(endpoint) = &self.fallback_endpoint {
            validation::validate_url("fallback_endpoint", endpoint)?;
        }
        if let Some(path) = &self.input_file {
            validation::validate_path("input_file", path)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("rolling_window", self.rolling_window, 1)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        self.event_options().calendar()?;
        Ok(())
    }
}
