//! Destinations for the projected venue record.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

use crate::schema::VenueRecord;

/// Where a successful run writes its record.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Writes the record. Called at most once per run.
    async fn persist(&self, record: &VenueRecord) -> io::Result<()>;

    /// Human-readable description of the destination.
    fn location(&self) -> String;
}

/// Writes the record as pretty-printed JSON to a file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink writing to `path`. Parent directories are created on write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonFileSink {
    async fn persist(&self, record: &VenueRecord) -> io::Result<()> {
        let mut body = serde_json::to_vec_pretty(record).map_err(io::Error::other)?;
        body.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, body).await?;
        tracing::debug!(path = %self.path.display(), "venue record written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
