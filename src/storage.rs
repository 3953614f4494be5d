use crate::models::{AnalyticsResponse, ShortCode};
use crate::source::{AnalyticsSource, FetchError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::error;

/// Serves analytics from `{dir}/{code}.json` files.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn fixture_path(&self, code: &ShortCode) -> Option<PathBuf> {
        let stem = code.as_str();
        let plain = stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        plain.then(|| self.dir.join(format!("{stem}.json")))
    }
}

#[async_trait]
impl AnalyticsSource for FixtureSource {
    async fn fetch(&self, code: &ShortCode) -> Result<AnalyticsResponse, FetchError> {
        let Some(path) = self.fixture_path(code) else {
            return Err(FetchError::NotFound);
        };

        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                error!("failed to parse fixture {}: {err}", path.display());
                FetchError::Malformed(err.to_string())
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound),
            Err(err) => {
                error!("failed to read fixture {}: {err}", path.display());
                Err(FetchError::Io(err.to_string()))
            }
        }
    }
}
