//! Channel-based feed source.
//!
//! Frames are pushed through a tokio mpsc channel. Useful when the feed is
//! bridged from somewhere else, and for driving the pipeline in tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{FeedError, FeedSource};

/// A feed source that yields frames sent through a channel.
///
/// The source is exhausted once every sender has been dropped.
///
/// # Example
///
/// ```
/// use dpswatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("bridge");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<String>,
    description: String,
}

impl ChannelSource {
    /// Wrap an existing receiver.
    pub fn new(receiver: mpsc::Receiver<String>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a sender/source pair.
    pub fn create(source_description: &str) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(64);
        (tx, Self::new(rx, source_description))
    }
}

#[async_trait]
impl FeedSource for ChannelSource {
    async fn next_frame(&mut self) -> Result<Option<String>, FeedError> {
        Ok(self.receiver.recv().await)
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn close(&mut self) -> Result<(), FeedError> {
        self.receiver.close();
        Ok(())
    }
}
