//! Feed sources and the receive cycle.
//!
//! A [`FeedSource`] yields raw text frames from the combat tracker. The
//! receive cycle ([`receive_loop`]) pulls frames one at a time, records them
//! to the optional [`EnvelopeLog`], decodes them, and reduces them into the
//! shared state through a [`StateWriter`]. It runs on its own tokio task
//! ([`FeedHandle::spawn`]) so the render cycle never waits on the network.
//!
//! Recoverable problems (malformed frames, schema mismatches) are absorbed
//! here and only logged. Transport failures end the cycle with an error.

mod channel;
mod journal;
mod replay;
mod websocket;

pub use channel::ChannelSource;
pub use journal::EnvelopeLog;
pub use replay::ReplaySource;
pub use websocket::WebSocketSource;

use std::fmt::Debug;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::data::{DecodeError, Envelope, Event, StateWriter};

/// Fatal transport problems.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The initial connection could not be established.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// Reading from an open connection failed.
    #[error("feed read failed: {0}")]
    Read(#[source] tokio_tungstenite::tungstenite::Error),

    /// The peer closed the connection.
    #[error("feed connection closed")]
    Closed,

    /// A recorded envelope log could not be read.
    #[error("failed to read replay log {}: {source}", path.display())]
    Replay {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The receive task ended without reporting a result.
    #[error("feed task aborted")]
    Aborted,
}

/// Trait for receiving raw frames from the feed.
///
/// Implementations exist for a live WebSocket connection, a recorded
/// envelope log, and an in-memory channel.
///
/// # Example
///
/// ```
/// use dpswatch::{ChannelSource, FeedSource};
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("example");
/// tx.send(r#"{"msgtype":"LogLine"}"#.to_string()).await.unwrap();
/// assert!(source.next_frame().await.unwrap().is_some());
/// # });
/// ```
#[async_trait]
pub trait FeedSource: Send + Debug {
    /// Wait for the next text frame.
    ///
    /// Returns `Ok(None)` when the source is cleanly exhausted.
    async fn next_frame(&mut self) -> Result<Option<String>, FeedError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Release the underlying connection.
    async fn close(&mut self) -> Result<(), FeedError> {
        Ok(())
    }
}

/// How a receive cycle ended without a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedExit {
    /// Shutdown was requested.
    Shutdown,
    /// The source has no more frames.
    Exhausted,
}

/// Process one frame: parse, record, decode, reduce.
///
/// Returns the decoded event's tag, or the reason the frame was dropped.
/// A dropped frame leaves the state untouched.
pub fn ingest(
    frame: &str,
    writer: &StateWriter,
    journal: Option<&mut EnvelopeLog>,
) -> Result<String, DecodeError> {
    let frame: Value = serde_json::from_str(frame).map_err(DecodeError::Envelope)?;
    let envelope = Envelope::from_value(&frame)?;

    if let Some(journal) = journal {
        if let Err(e) = journal.record(&frame) {
            warn!(path = %journal.path().display(), error = %e, "failed to record envelope");
        }
    }

    let event = Event::decode(envelope)?;
    let tag = event.tag().to_string();
    if let Event::Unknown { raw_tag } = &event {
        debug!(msgtype = %raw_tag, "ignoring unrecognized message");
    }

    writer.apply(event);
    Ok(tag)
}

/// Run the receive cycle until shutdown, exhaustion, or a transport error.
///
/// Frames are applied strictly in arrival order.
pub async fn receive_loop(
    source: &mut dyn FeedSource,
    writer: &StateWriter,
    mut journal: Option<&mut EnvelopeLog>,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<FeedExit, FeedError> {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let next = tokio::select! {
            biased;
            _ = shutdown.changed() => None,
            frame = source.next_frame() => Some(frame),
        };

        let Some(frame) = next else {
            break;
        };

        match frame? {
            Some(text) => {
                if let Err(e) = ingest(&text, writer, journal.as_deref_mut()) {
                    debug!(error = %e, "dropped frame");
                }
            }
            None => return Ok(FeedExit::Exhausted),
        }
    }

    if let Err(e) = source.close().await {
        warn!(error = %e, "error while closing feed");
    }
    Ok(FeedExit::Shutdown)
}

/// Owner of a receive cycle running on a background task.
#[derive(Debug)]
pub struct FeedHandle {
    description: String,
    shutdown: watch::Sender<bool>,
    exit: oneshot::Receiver<Result<FeedExit, FeedError>>,
    exited: bool,
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Spawn the receive cycle for `source` on the current tokio runtime.
    pub fn spawn(
        mut source: Box<dyn FeedSource>,
        writer: StateWriter,
        mut journal: Option<EnvelopeLog>,
    ) -> Self {
        let description = source.description().to_string();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let (exit_tx, exit_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result =
                receive_loop(source.as_mut(), &writer, journal.as_mut(), &mut shutdown_rx).await;

            match &result {
                Ok(exit) => info!(?exit, "feed receive cycle finished"),
                Err(e) => error!(error = %e, "feed receive cycle failed"),
            }
            let _ = exit_tx.send(result);
        });

        Self {
            description,
            shutdown: shutdown_tx,
            exit: exit_rx,
            exited: false,
            task,
        }
    }

    /// Returns the description of the underlying source.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check, without blocking, whether the receive cycle has ended.
    ///
    /// Yields the outcome exactly once.
    pub fn poll_exit(&mut self) -> Option<Result<FeedExit, FeedError>> {
        if self.exited {
            return None;
        }

        match self.exit.try_recv() {
            Ok(result) => {
                self.exited = true;
                Some(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.exited = true;
                Some(Err(FeedError::Aborted))
            }
        }
    }

    /// Ask the receive cycle to stop and release its source.
    ///
    /// Returns the task handle so the caller can wait for the release.
    pub fn shutdown(self) -> JoinHandle<()> {
        let _ = self.shutdown.send(true);
        self.task
    }
}
