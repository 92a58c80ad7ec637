pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use self::core::{etl::BoardEngine, pipeline::LeaderboardPipeline};
pub use domain::services::{build_leaderboard, EventSettings};
pub use utils::error::{BoardError, Result};
