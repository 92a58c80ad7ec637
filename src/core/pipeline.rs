pub use crate::app::pipelines::LeaderboardPipeline;
