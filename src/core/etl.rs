use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a pipeline's stages once, in order. Failures are not retried.
pub struct BoardEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BoardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting leaderboard run");

        let stage = Instant::now();
        let raw = self.pipeline.extract().await?;
        tracing::info!(
            members = raw.members.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Extracted leaderboard"
        );

        let stage = Instant::now();
        let leaderboard = self.pipeline.transform(raw).await?;
        tracing::info!(
            participants = leaderboard.participants.len(),
            days = leaderboard.days.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Scored leaderboard"
        );
        if let Some(leader) = leaderboard.standings.first() {
            tracing::info!("Leader: {} with {} points", leader.name, leader.total_score);
        }

        let stage = Instant::now();
        let output_path = self.pipeline.load(leaderboard).await?;
        tracing::info!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Output saved to: {}",
            output_path
        );

        tracing::info!(
            total_ms = started.elapsed().as_millis() as u64,
            "Leaderboard run finished"
        );
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Leaderboard, RawLeaderboard};
    use crate::domain::services::{self, EventSettings};
    use crate::utils::error::BoardError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPipeline {
        loads: AtomicUsize,
        fail_extract: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<RawLeaderboard> {
            if self.fail_extract {
                return Err(BoardError::SourceUnavailable {
                    attempted: "http://unreachable".to_string(),
                });
            }
            Ok(RawLeaderboard::default())
        }

        async fn transform(&self, raw: RawLeaderboard) -> Result<Leaderboard> {
            Ok(services::build_leaderboard(&raw, &EventSettings::for_year(2021)?))
        }

        async fn load(&self, _leaderboard: Leaderboard) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok("out/leaderboard.zip".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_returns_load_location() {
        let engine = BoardEngine::new(CountingPipeline::default());
        assert_eq!(engine.run().await.unwrap(), "out/leaderboard.zip");
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let engine = BoardEngine::new(CountingPipeline {
            fail_extract: true,
            ..Default::default()
        });
        assert!(matches!(
            engine.run().await,
            Err(BoardError::SourceUnavailable { .. })
        ));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}
