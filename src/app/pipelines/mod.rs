pub mod leaderboard_pipeline;

pub use leaderboard_pipeline::LeaderboardPipeline;
