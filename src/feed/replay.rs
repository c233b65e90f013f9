//! Replay of a recorded envelope log.
//!
//! Reads the file written by [`super::EnvelopeLog`] (concatenated JSON
//! values) and yields each value as a frame, spaced by a fixed interval.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{FeedError, FeedSource};

/// A feed source that replays a recorded session.
#[derive(Debug)]
pub struct ReplaySource {
    frames: VecDeque<String>,
    interval: Duration,
    description: String,
    started: bool,
}

impl ReplaySource {
    /// Load a recorded log from disk.
    pub async fn open<P: AsRef<Path>>(path: P, interval: Duration) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FeedError::Replay {
                path: path.to_path_buf(),
                source,
            })?;

        let mut replay = Self::from_log(&content, interval);
        replay.description = format!("replay: {}", path.display());
        Ok(replay)
    }

    /// Build a replay from log content already in memory.
    ///
    /// Parsing stops at the first malformed value; everything before it is kept.
    pub fn from_log(content: &str, interval: Duration) -> Self {
        let mut frames = VecDeque::new();

        for value in serde_json::Deserializer::from_str(content).into_iter::<Value>() {
            match value {
                Ok(value) => frames.push_back(value.to_string()),
                Err(e) => {
                    warn!(error = %e, kept = frames.len(), "envelope log truncated");
                    break;
                }
            }
        }

        Self {
            frames,
            interval,
            description: "replay".to_string(),
            started: false,
        }
    }

    /// Number of frames not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl FeedSource for ReplaySource {
    async fn next_frame(&mut self) -> Result<Option<String>, FeedError> {
        if self.frames.is_empty() {
            return Ok(None);
        }

        if self.started && !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
        self.started = true;

        Ok(self.frames.pop_front())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
