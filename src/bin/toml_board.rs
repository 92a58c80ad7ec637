use anyhow::Context;
use clap::Parser;
use starboard::core::ConfigProvider;
use starboard::domain::model::DAY_COUNT;
use starboard::utils::{logger, validation::Validate};
use starboard::{BoardEngine, EventSettings, LeaderboardPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-board")]
#[command(about = "Leaderboard scoring driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "starboard.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Score every member, ignoring `scoring.excluded_members`
    #[arg(long)]
    include_all: bool,

    /// Show the resolved settings and release calendar without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?
        .with_include_all(args.include_all);

    if args.include_all {
        tracing::info!("🔧 Exclusion list ignored");
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = config
        .event_settings()
        .context("failed to resolve event settings")?;

    display_config_summary(&config, &settings);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        display_release_calendar(&settings);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = LeaderboardPipeline::new(storage, config);
    let engine = BoardEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Leaderboard bundle written");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Leaderboard run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, settings: &EventSettings) {
    println!("📋 Configuration Summary:");
    if let Some(name) = &config.event.name {
        println!("  Event: {}", name);
    }
    println!("  Year: {}", settings.year);
    println!("  Time zone: {}", settings.calendar.zone().name());

    match config.input_file() {
        Some(path) => println!("  Source: file {}", path),
        None => {
            println!("  Source: {}", config.endpoint().unwrap_or("-"));
            if let Some(mirror) = config.fallback_endpoint() {
                println!("  Mirror: {}", mirror);
            }
            println!("  Headers: {} custom headers", config.request_headers().len());
        }
    }

    println!("  Output: {}/{}", config.output_path(), config.bundle_name());
    println!("  Rolling window: {} days", settings.trajectory.rolling_window);
    println!("  Forfeits: {}", settings.forfeits.len());
    if !settings.excluded_members.is_empty() {
        println!("  Excluded: {}", settings.excluded_members.join(", "));
    }
    println!();
}

fn display_release_calendar(settings: &EventSettings) {
    println!("🗓️ Release Calendar:");
    for day in 1..=DAY_COUNT as u8 {
        let first = settings.calendar.release_instant(day);
        let second = settings.calendar.second_release_instant(day);
        if let (Some(first), Some(second)) = (first, second) {
            println!(
                "  Day {:>2}: {}  (second window {})",
                day,
                first.format("%Y-%m-%d %H:%M %Z"),
                second.format("%H:%M %Z")
            );
        }
    }

    for entry in settings.forfeits.entries() {
        println!(
            "  Forfeit: {} day {} star {}",
            entry.participant, entry.day, entry.star
        );
    }
}
