//! # dpswatch
//!
//! A live terminal damage meter for the ACT/OverlayPlugin combat feed.
//!
//! The crate attaches to the feed's WebSocket, reduces the stream of typed
//! events into a single aggregate state, and redraws a ranked, viewport-fitted
//! view of that state at a fixed rate.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  receive cycle (tokio task)           render cycle (main thread) │
//! │                                                                  │
//! │  ┌─────────┐   ┌──────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │  feed   │──▶│   data   │──▶│ StateWriter │   │     app     │  │
//! │  │(frames) │   │(decode + │   └──────┬──────┘   │ (snapshot)  │  │
//! │  └─────────┘   │ reduce)  │          │ watch    └──────┬──────┘  │
//! │       ▲        └──────────┘          ▼                 ▼         │
//! │       │                       ┌─────────────┐   ┌─────────────┐  │
//! │  WebSocket | Replay | Channel │ StateReader │──▶│     ui      │  │
//! │                               └─────────────┘   │(rank, fit,  │  │
//! │                                                 │ draw)       │  │
//! │                                                 └─────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`feed`]**: Frame sources ([`FeedSource`] trait) for the live
//!   WebSocket, recorded envelope logs, and in-memory channels, plus the
//!   receive cycle that drives them
//! - **[`data`]**: Envelope decoding, the aggregate state and its reducer,
//!   ranking, and the single-slot handoff between the two cycles
//! - **[`ui`]**: Adaptive layout and ratatui rendering
//! - **[`app`]**: Render-side application state
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Connect to OverlayPlugin on this machine
//! dpswatch
//!
//! # Connect elsewhere, or replay a recorded session
//! dpswatch --url ws://192.168.1.20:10501/MiniParse
//! dpswatch --replay event-log.txt --replay-interval 100ms
//! ```
//!
//! ### As a library
//!
//! ```
//! use dpswatch::{feed, shared_state, ChannelSource};
//!
//! # tokio_test::block_on(async {
//! let (writer, mut reader) = shared_state();
//! let (tx, mut source) = ChannelSource::create("example");
//!
//! tx.send(r#"{"type":"broadcast","msgtype":"ChangeZone","msg":{"zoneID":340,"zoneName":"The Lavender Beds"}}"#.to_string())
//!     .await
//!     .unwrap();
//! drop(tx);
//!
//! let (_stop, mut shutdown) = tokio::sync::watch::channel(false);
//! feed::receive_loop(&mut source, &writer, None, &mut shutdown).await.unwrap();
//!
//! let state = reader.latest().unwrap();
//! assert_eq!(state.current_zone.unwrap().name, "The Lavender Beds");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod feed;
pub mod logging;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, FeedStatus};
pub use config::{Settings, ThemeChoice};
pub use data::{
    rank, reduce, shared_state, AggregateState, Combatant, DecodeError, Encounter, Envelope,
    Event, Player, RankOptions, RankedCombatant, Role, Roster, StateReader, StateWriter, Zone,
};
pub use feed::{
    ChannelSource, EnvelopeLog, FeedError, FeedExit, FeedHandle, FeedSource, ReplaySource,
    WebSocketSource,
};
