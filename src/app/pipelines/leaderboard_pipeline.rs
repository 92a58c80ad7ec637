use crate::app::presentation::{charts, tables};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::Leaderboard;
use crate::domain::raw::RawLeaderboard;
use crate::domain::services;
use crate::utils::error::{BoardError, Result};
use reqwest::Client;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub struct LeaderboardPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: Client,
}

impl<S: Storage, C: ConfigProvider> LeaderboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<RawLeaderboard> {
        tracing::debug!("Requesting leaderboard from: {}", url);

        let mut request = self.client.get(url);
        for (name, value) in self.config.request_headers() {
            request = request.header(name, value);
        }
        if let Some(timeout) = self.config.request_timeout() {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Leaderboard response status: {}", status);

        if !status.is_success() {
            return Err(BoardError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(RawLeaderboard::from_slice(&body)?)
    }

    async fn read_input_file(&self, path: &str) -> Result<RawLeaderboard> {
        tracing::debug!("Reading leaderboard from file: {}", path);
        let bytes = tokio::fs::read(path).await?;
        Ok(RawLeaderboard::from_slice(&bytes)?)
    }

    fn bundle(&self, leaderboard: &Leaderboard) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default();
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file("leaderboard.json", options)?;
        zip.write_all(&serde_json::to_vec_pretty(leaderboard)?)?;

        zip.start_file("standings.csv", options)?;
        zip.write_all(&tables::standings_csv(leaderboard)?)?;

        zip.start_file("days.csv", options)?;
        zip.write_all(&tables::day_results_csv(leaderboard)?)?;

        for (name, body) in charts::render_all(leaderboard)? {
            zip.start_file(name, options)?;
            zip.write_all(&body)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LeaderboardPipeline<S, C> {
    async fn extract(&self) -> Result<RawLeaderboard> {
        if let Some(path) = self.config.input_file() {
            return self.read_input_file(path).await;
        }

        let sources: Vec<&str> = [self.config.endpoint(), self.config.fallback_endpoint()]
            .into_iter()
            .flatten()
            .collect();

        if sources.is_empty() {
            return Err(BoardError::MissingConfigError {
                field: "source.endpoint".to_string(),
            });
        }

        for url in &sources {
            match self.fetch(url).await {
                Ok(raw) => {
                    tracing::debug!("Fetched {} members from {}", raw.members.len(), url);
                    return Ok(raw);
                }
                Err(e) => tracing::warn!("Leaderboard source {} failed: {}", url, e),
            }
        }

        Err(BoardError::SourceUnavailable {
            attempted: sources.join(", "),
        })
    }

    async fn transform(&self, raw: RawLeaderboard) -> Result<Leaderboard> {
        let settings = self.config.event_settings()?;
        Ok(services::build_leaderboard(&raw, &settings))
    }

    async fn load(&self, leaderboard: Leaderboard) -> Result<String> {
        let bundle_name = self.config.bundle_name();
        let output_path = format!("{}/{}", self.config.output_path(), bundle_name);

        let zip_data = self.bundle(&leaderboard)?;

        tracing::debug!("Writing bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&bundle_name, &zip_data).await?;

        tracing::debug!("Bundle saved successfully");
        Ok(output_path)
    }
}
