use crate::config::EventOptions;
use crate::core::ConfigProvider;
use crate::domain::services::{EventSettings, ForfeitEntry, ForfeitTable, TrajectorySettings};
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub event: EventConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub forfeits: Vec<ForfeitEntry>,
    pub load: LoadConfig,
    /// Set from the command line to score every member regardless of
    /// `scoring.excluded_members`.
    #[serde(skip)]
    pub include_all: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: Option<String>,
    pub year: i32,
    pub time_zone: Option<String>,
    pub first_day: Option<String>,
    pub release_time: Option<String>,
    pub second_release_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub fallback_endpoint: Option<String>,
    pub input_file: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub rolling_window: Option<usize>,
    pub active_score_threshold: Option<u32>,
    pub excluded_members: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub bundle_name: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BoardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SESSION})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigError {
            message: format!("environment pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    pub fn event_options(&self) -> EventOptions<'_> {
        EventOptions {
            year: self.event.year,
            time_zone: self.event.time_zone.as_deref(),
            first_day: self.event.first_day.as_deref(),
            release_time: self.event.release_time.as_deref(),
            second_release_offset: self.event.second_release_offset.as_deref(),
        }
    }

    pub fn excluded_members(&self) -> Vec<String> {
        if self.include_all {
            return Vec::new();
        }
        self.scoring.excluded_members.clone().unwrap_or_default()
    }

    pub fn trajectory_settings(&self) -> TrajectorySettings {
        let defaults = TrajectorySettings::default();
        TrajectorySettings {
            rolling_window: self.scoring.rolling_window.unwrap_or(defaults.rolling_window),
            active_score_threshold: self
                .scoring
                .active_score_threshold
                .unwrap_or(defaults.active_score_threshold),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        let source = &self.source;
        if source.input_file.is_none() && source.endpoint.is_none() {
            return Err(BoardError::MissingConfigError {
                field: "source.endpoint".to_string(),
            });
        }
        if let Some(endpoint) = &source.endpoint {
            validation::validate_url("source.endpoint", endpoint)?;
        }
        if let Some(endpoint) = &source.fallback_endpoint {
            validation::validate_url("source.fallback_endpoint", endpoint)?;
        }
        if let Some(path) = &source.input_file {
            validation::validate_path("source.input_file", path)?;
        }
        if let Some(timeout) = source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }
        for (name, value) in source.headers.iter().flatten() {
            validation::validate_non_empty_string("source.headers", name)?;
            if value.contains("${") {
                return Err(BoardError::InvalidConfigValueError {
                    field: format!("source.headers.{}", name),
                    value: value.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        if let Some(name) = &self.load.bundle_name {
            validation::validate_non_empty_string("load.bundle_name", name)?;
        }
        validation::validate_positive_number(
            "scoring.rolling_window",
            self.trajectory_settings().rolling_window,
            1,
        )?;

        self.event_options().calendar()?;
        ForfeitTable::from_entries(&self.forfeits)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> Option<&str> {
        self.source.endpoint.as_deref()
    }

    fn fallback_endpoint(&self) -> Option<&str> {
        self.source.fallback_endpoint.as_deref()
    }

    fn input_file(&self) -> Option<&str> {
        self.source.input_file.as_deref()
    }

    fn request_headers(&self) -> Vec<(String, String)> {
        self.source
            .headers
            .iter()
            .flatten()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn bundle_name(&self) -> String {
        self.load
            .bundle_name
            .clone()
            .unwrap_or_else(|| format!("leaderboard-{}.zip", self.event.year))
    }

    fn event_settings(&self) -> Result<EventSettings> {
        self.event_options().settings(
            ForfeitTable::from_entries(&self.forfeits)?,
            self.excluded_members(),
            self.trajectory_settings(),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
