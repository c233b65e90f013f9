//! WebSocket feed source.
//!
//! Connects to the OverlayPlugin endpoint (`ws://localhost:10501/MiniParse`
//! by default) and yields its text frames.

use std::fmt;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::{FeedError, FeedSource};

/// A live WebSocket connection to the feed.
///
/// Any read failure, close frame, or end of stream is reported as an error:
/// there is no reconnection.
pub struct WebSocketSource {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    description: String,
}

impl WebSocketSource {
    /// Open the connection.
    pub async fn connect(url: &str) -> Result<Self, FeedError> {
        let (socket, _response) =
            connect_async(url)
                .await
                .map_err(|source| FeedError::Connect {
                    url: url.to_string(),
                    source,
                })?;

        info!(url, "connected to feed");
        Ok(Self {
            socket,
            description: format!("ws: {}", url),
        })
    }
}

impl fmt::Debug for WebSocketSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketSource")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FeedSource for WebSocketSource {
    async fn next_frame(&mut self) -> Result<Option<String>, FeedError> {
        loop {
            match self.socket.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "feed sent close frame");
                    return Err(FeedError::Closed);
                }
                // Control and binary frames carry no envelopes
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(FeedError::Read(e)),
                None => return Err(FeedError::Closed),
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn close(&mut self) -> Result<(), FeedError> {
        self.socket.close(None).await.map_err(FeedError::Read)?;
        // Drain until the peer acknowledges so the TCP connection is released cleanly
        while let Some(Ok(_)) = self.socket.next().await {}
        Ok(())
    }
}
