//! Event decoding, state reduction, and ranking.
//!
//! This module turns raw feed envelopes into a consistent in-memory picture
//! of the current fight.
//!
//! ## Submodules
//!
//! - [`envelope`]: The outer `{type, msgtype, msg}` frame
//! - [`event`]: Typed events decoded from an envelope ([`Event`], [`DecodeError`])
//! - [`stat`]: Zero-on-failure parsing of display-formatted numbers
//! - [`model`]: [`AggregateState`] and the entities it holds
//! - [`reducer`]: Folding events into the state
//! - [`shared`]: Latest-state handoff between the receive and render cycles
//! - [`ranking`]: Ordered, filtered view of the combatants with damage share
//! - [`role`]: Tank/healer/DPS classification for display color
//! - [`duration`]: Parsing of duration strings (e.g., "250ms", "1s")
//!
//! ## Data Flow
//!
//! ```text
//! text frame
//!     │
//!     ▼
//! Envelope::parse() ──▶ Event::decode()
//!                            │
//!                            ▼
//!                  StateWriter::apply()  (AggregateState::apply)
//!                            │
//!                            ▼
//!                  StateReader::latest() ──▶ rank()
//! ```

pub mod duration;
pub mod envelope;
pub mod event;
pub mod model;
pub mod ranking;
pub mod reducer;
pub mod role;
pub mod shared;
pub mod stat;

pub use envelope::Envelope;
pub use event::{DecodeError, Event};
pub use model::{AggregateState, Combatant, Encounter, Player, Roster, Zone};
pub use ranking::{rank, RankOptions, RankedCombatant};
pub use reducer::reduce;
pub use role::Role;
pub use shared::{shared_state, StateReader, StateWriter};
