use crate::domain::model::Leaderboard;
use crate::domain::raw::RawLeaderboard;
use crate::domain::services::EventSettings;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Destination for the output bundle. The input document is read from its
/// own path, not through here.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> Option<&str>;
    fn fallback_endpoint(&self) -> Option<&str>;
    fn input_file(&self) -> Option<&str>;
    fn request_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
    fn request_timeout(&self) -> Option<Duration> {
        None
    }
    fn output_path(&self) -> &str;
    fn bundle_name(&self) -> String;
    fn event_settings(&self) -> Result<EventSettings>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawLeaderboard>;
    async fn transform(&self, raw: RawLeaderboard) -> Result<Leaderboard>;
    async fn load(&self, leaderboard: Leaderboard) -> Result<String>;
}
