//! Ping-pong match state library.
//!
//! Two users trade a "ping" and a "pong" token in a chat channel; each hit is
//! simulated and the match tracks turns and score until a player exits.
//!
//! # Overview
//!
//! - **Match State** - [`state::Match`] and [`state::MatchRegistry`] track who plays,
//!   whose turn it is and the score.
//!
//! - **Hit Resolution** - [`hit::HitResolver`] decides where the ball bounces,
//!   seeded by the message text and an entropy draw.
//!
//! - **Dispatch** - [`dispatcher::CommandDispatcher`] applies the protocol to
//!   incoming chat events and produces replies.
//!
//! # Design Principles
//!
//! 1. **No networking** - This crate consumes events and returns reply text;
//!    delivering them is the transport's job.
//!
//! 2. **Single owner** - The dispatcher owns the registry; events are handled
//!    one at a time through `&mut self`.
//!
//! 3. **Errors are replies** - Rule violations become chat replies, never panics.
//!
//! # Example
//!
//! ```rust
//! use pingpong_state::{ChatEvent, CommandDispatcher, TriggerGrammar};
//!
//! let grammar = TriggerGrammar::new("ping", "pong").unwrap();
//! let mut dispatcher = CommandDispatcher::new(grammar);
//!
//! let reply = dispatcher
//!     .handle(&ChatEvent::new("1", "chan", "guild", "ping"))
//!     .unwrap();
//! assert!(reply.content.contains("started a game"));
//!
//! let reply = dispatcher
//!     .handle(&ChatEvent::new("2", "chan", "guild", "pong"))
//!     .unwrap();
//! assert_eq!(reply.content, "ℹ <@2> joined the match. <@1> serves.");
//! ```

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod hit;
pub mod mention;
pub mod state;

pub use command::{ChatEvent, Command, Trigger, TriggerGrammar};
pub use config::{Config, ConfigError};
pub use dispatcher::{CommandDispatcher, CommandError, Reply};
pub use hit::{HitOutcome, HitResolver};
pub use mention::{DirectoryError, TagDirectory, UserDirectory};
pub use state::*;
