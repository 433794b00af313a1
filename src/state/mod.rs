//! Match state for the ping-pong game.
//!
//! - `game` - Single match state machine and the registry of active matches
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    MatchRegistry                      │
//! │                                                       │
//! │   [ Match #1 ] [ Match #2 ] ... [ Match #n ]          │
//! │     creation order ──────────────────────▶            │
//! │                                                       │
//! │   find_by_participant: scan oldest → newest           │
//! │   find_joinable:       scan newest → oldest           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every match in the registry is live; ending a match removes it.

pub mod game;

pub use game::{JoinRejection, Match, MatchError, MatchId, MatchRegistry, MatchStatus};
