use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::domain::Request;
use tokio::fs;

use crate::RequestStore;

/// Pretty-printed JSON array in a single file, read and written wholesale.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "requests.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RequestStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Request>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read '{}'", self.path.display()))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("'{}' is not a valid request list", self.path.display()))
    }

    async fn save(&self, requests: &[Request]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create parent directory '{}'", parent.display())
            })?;
        }

        let body = serde_json::to_string_pretty(requests).context("failed to encode requests")?;
        let staging = self.staging_path();
        fs::write(&staging, body)
            .await
            .with_context(|| format!("failed to write '{}'", staging.display()))?;
        fs::rename(&staging, &self.path).await.with_context(|| {
            format!(
                "failed to move '{}' into place at '{}'",
                staging.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}
