//! Match state management.
//!
//! Tracks active ping-pong matches: who plays, whose turn it is, and the score.
//!
//! # State Diagram
//!
//! ```text
//! ┌──────────┐   join    ┌────────────┐   exit    ┌───────┐
//! │ Waiting  │──────────▶│ InProgress │──────────▶│ Ended │
//! └──────────┘           └────────────┘           └───────┘
//!      │                   │       ▲
//!      │ exit              └───────┘
//!      ▼                  record_hit
//! ┌───────┐
//! │ Ended │
//! └───────┘
//! ```
//!
//! An ended match is simply no longer present in the [`MatchRegistry`].

use std::fmt;

use thiserror::Error;

/// Registry-assigned match identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

/// Match lifecycle states while registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Slot 1 is empty
    Waiting,
    /// Both players present, turns alternate
    InProgress,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
        }
    }
}

/// Why a join was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinRejection {
    #[error("second user can't be the same as first user")]
    SamePlayer,
    #[error("second user already set")]
    AlreadyFull,
}

/// Match errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("{0}")]
    InvalidJoin(JoinRejection),
}

/// A single ping-pong match.
#[derive(Debug, Clone)]
pub struct Match {
    /// Assigned on registration; `MatchId(0)` until then
    pub id: MatchId,

    /// Slot 0: the player who served
    first_player: String,

    /// Slot 1: set once someone joins
    second_player: Option<String>,

    /// Points per slot
    scores: [u32; 2],

    /// Channel the match is bound to
    pub channel_id: String,

    /// True when the ping side hit last and the pong side must answer
    last_hit_was_ping: bool,

    /// Resolved hit attempts
    hit_count: u32,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_hit_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Match {
    /// Create a match waiting for a second player.
    pub fn create(first_player: String, channel_id: String) -> Self {
        Self {
            id: MatchId(0),
            first_player,
            second_player: None,
            scores: [0, 0],
            channel_id,
            last_hit_was_ping: false,
            hit_count: 0,
            created_at: chrono::Utc::now(),
            started_at: None,
            last_hit_at: None,
        }
    }

    /// Fill slot 1 and start the match.
    pub fn join(&mut self, second_player: String) -> Result<(), MatchError> {
        if self.first_player == second_player {
            return Err(MatchError::InvalidJoin(JoinRejection::SamePlayer));
        }
        if self.second_player.is_some() {
            return Err(MatchError::InvalidJoin(JoinRejection::AlreadyFull));
        }

        self.second_player = Some(second_player);
        self.started_at = Some(chrono::Utc::now());
        Ok(())
    }

    /// Record a resolved hit attempt.
    ///
    /// A miss credits the opponent of the side that just hit. The turn passes
    /// whether or not the hit landed.
    pub fn record_hit(&mut self, success: bool) {
        self.last_hit_at = Some(chrono::Utc::now());
        self.hit_count += 1;

        if !success {
            if self.last_hit_was_ping {
                self.scores[0] += 1;
            } else {
                self.scores[1] += 1;
            }
        }

        self.last_hit_was_ping = !self.last_hit_was_ping;
    }

    /// Player in slot 0.
    pub fn first_player(&self) -> &str {
        &self.first_player
    }

    /// Player in slot 1, if joined.
    pub fn second_player(&self) -> Option<&str> {
        self.second_player.as_deref()
    }

    /// Both participants in slot order.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.first_player.as_str()).chain(self.second_player.as_deref())
    }

    /// Started once slot 1 is filled.
    pub fn is_started(&self) -> bool {
        self.second_player.is_some()
    }

    pub fn last_hit_was_ping(&self) -> bool {
        self.last_hit_was_ping
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants().any(|p| p == user_id)
    }

    pub fn is_joinable(&self) -> bool {
        self.second_player.is_none()
    }

    pub fn status(&self) -> MatchStatus {
        if self.is_started() {
            MatchStatus::InProgress
        } else {
            MatchStatus::Waiting
        }
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    /// Score formatted as `slot0 - slot1`.
    pub fn score_line(&self) -> String {
        format!("{} - {}", self.scores[0], self.scores[1])
    }

    /// Snapshot for logging.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "match_id": self.id.0,
            "channel_id": self.channel_id,
            "status": self.status().as_str(),
            "players": [self.first_player, self.second_player],
            "scores": self.scores,
            "last_hit_was_ping": self.last_hit_was_ping,
            "hit_count": self.hit_count,
            "created_at": self.created_at,
            "started_at": self.started_at,
            "last_hit_at": self.last_hit_at
        })
    }
}

/// Match registry - tracks all matches that have not ended.
///
/// Matches are kept in creation order; lookups are linear since a channel
/// rarely holds more than a handful of games.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    matches: Vec<Match>,
    next_id: u64,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a match, assigning its ID.
    pub fn add(&mut self, mut game: Match) -> MatchId {
        self.next_id += 1;
        let id = MatchId(self.next_id);
        game.id = id;
        self.matches.push(game);
        id
    }

    /// Create and register a match for `first_player`.
    pub fn create(&mut self, first_player: String, channel_id: String) -> MatchId {
        self.add(Match::create(first_player, channel_id))
    }

    /// Get a match by ID.
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Get a mutable match by ID.
    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Get the match a user plays in, in either slot.
    pub fn find_by_participant(&self, user_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.has_participant(user_id))
    }

    /// Newest match still waiting for a second player.
    pub fn find_joinable(&self) -> Option<&Match> {
        self.matches.iter().rev().find(|m| m.is_joinable())
    }

    pub fn find_joinable_mut(&mut self) -> Option<&mut Match> {
        self.matches.iter_mut().rev().find(|m| m.is_joinable())
    }

    /// Remove a match. Removing an absent match returns `None`.
    pub fn remove(&mut self, id: MatchId) -> Option<Match> {
        let index = self.matches.iter().position(|m| m.id == id)?;
        Some(self.matches.remove(index))
    }

    /// Matches in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Count matches still waiting for a second player.
    pub fn waiting_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_joinable()).count()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.matches.iter().map(|m| m.to_json()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn started_match() -> Match {
        let mut game = Match::create("alice".to_string(), "chan-1".to_string());
        game.join("bob".to_string()).unwrap();
        game
    }

    #[test]
    fn test_match_create() {
        let game = Match::create("alice".to_string(), "chan-1".to_string());
        assert_eq!(game.first_player(), "alice");
        assert_eq!(game.second_player(), None);
        assert_eq!(game.scores(), [0, 0]);
        assert_eq!(game.status(), MatchStatus::Waiting);
        assert!(!game.is_started());
        assert!(!game.last_hit_was_ping());
        assert!(game.is_joinable());
        assert!(game.started_at.is_none());
    }

    #[test]
    fn test_match_join() {
        let game = started_match();
        assert_eq!(game.second_player(), Some("bob"));
        assert_eq!(game.status(), MatchStatus::InProgress);
        assert!(game.is_started());
        assert!(game.started_at.is_some());
        assert!(!game.is_joinable());
        assert_eq!(game.participants().collect::<Vec<_>>(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_match_join_rejections() {
        let mut game = Match::create("alice".to_string(), "chan-1".to_string());
        assert_eq!(
            game.join("alice".to_string()),
            Err(MatchError::InvalidJoin(JoinRejection::SamePlayer))
        );
        assert!(!game.is_started());

        game.join("bob".to_string()).unwrap();
        assert_eq!(
            game.join("carol".to_string()),
            Err(MatchError::InvalidJoin(JoinRejection::AlreadyFull))
        );
        assert_eq!(game.second_player(), Some("bob"));
    }

    #[test]
    fn test_rejected_join_leaves_match_waiting() {
        let mut game = Match::create("alice".to_string(), "chan-1".to_string());
        assert!(game.join("alice".to_string()).is_err());

        assert!(!game.is_started());
        assert!(game.started_at.is_none());
        assert_eq!(game.status(), MatchStatus::Waiting);
        assert_eq!(game.participants().collect::<Vec<_>>(), vec!["alice"]);
        assert_eq!(game.first_player(), "alice");
    }

    #[test]
    fn test_join_rejection_messages() {
        assert_eq!(
            MatchError::InvalidJoin(JoinRejection::SamePlayer).to_string(),
            "second user can't be the same as first user"
        );
        assert_eq!(
            MatchError::InvalidJoin(JoinRejection::AlreadyFull).to_string(),
            "second user already set"
        );
    }

    #[test]
    fn test_record_hit_success_toggles_turn_only() {
        let mut game = started_match();

        game.record_hit(true);
        assert!(game.last_hit_was_ping());
        assert_eq!(game.scores(), [0, 0]);

        game.record_hit(true);
        assert!(!game.last_hit_was_ping());
        assert_eq!(game.scores(), [0, 0]);
        assert_eq!(game.hit_count(), 2);
        assert!(game.last_hit_at.is_some());
    }

    #[test]
    fn test_record_hit_miss_credits_opponent() {
        let mut game = started_match();

        // Ping side misses: pong side (slot 1) scores
        game.record_hit(false);
        assert_eq!(game.scores(), [0, 1]);
        assert!(game.last_hit_was_ping());

        // Pong side misses: ping side (slot 0) scores
        game.record_hit(false);
        assert_eq!(game.scores(), [1, 1]);
        assert!(!game.last_hit_was_ping());
        assert_eq!(game.score_line(), "1 - 1");
    }

    #[test]
    fn test_scores_monotonic() {
        let mut game = started_match();
        let mut previous = game.scores();

        for i in 0..20 {
            game.record_hit(i % 3 == 0);
            let current = game.scores();
            let gained = (current[0] - previous[0]) + (current[1] - previous[1]);
            assert_eq!(gained, if i % 3 == 0 { 0 } else { 1 });
            previous = current;
        }
    }

    #[test]
    fn test_registry_add_assigns_ids() {
        let mut registry = MatchRegistry::new();
        let a = registry.create("alice".to_string(), "chan-1".to_string());
        let b = registry.create("carol".to_string(), "chan-1".to_string());

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(a).unwrap().first_player(), "alice");
        assert_eq!(registry.get(b).unwrap().first_player(), "carol");
    }

    #[test]
    fn test_registry_find_by_participant() {
        let mut registry = MatchRegistry::new();
        let id = registry.create("alice".to_string(), "chan-1".to_string());
        registry.get_mut(id).unwrap().join("bob".to_string()).unwrap();

        assert_eq!(registry.find_by_participant("alice").map(|m| m.id), Some(id));
        assert_eq!(registry.find_by_participant("bob").map(|m| m.id), Some(id));
        assert!(registry.find_by_participant("carol").is_none());
    }

    #[test]
    fn test_registry_find_joinable_prefers_newest() {
        let mut registry = MatchRegistry::new();
        assert!(registry.find_joinable().is_none());

        let first = registry.create("alice".to_string(), "chan-1".to_string());
        let second = registry.create("carol".to_string(), "chan-1".to_string());
        assert_eq!(registry.find_joinable().map(|m| m.id), Some(second));

        registry.get_mut(second).unwrap().join("dave".to_string()).unwrap();
        assert_eq!(registry.find_joinable().map(|m| m.id), Some(first));

        registry.get_mut(first).unwrap().join("bob".to_string()).unwrap();
        assert!(registry.find_joinable().is_none());
        assert_eq!(registry.waiting_count(), 0);
    }

    #[test]
    fn test_registry_remove_is_idempotent() {
        let mut registry = MatchRegistry::new();
        let id = registry.create("alice".to_string(), "chan-1".to_string());

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.first_player(), "alice");
        assert!(registry.is_empty());
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn test_registry_preserves_creation_order() {
        let mut registry = MatchRegistry::new();
        let a = registry.create("a".to_string(), "chan-1".to_string());
        let b = registry.create("b".to_string(), "chan-1".to_string());
        let c = registry.create("c".to_string(), "chan-1".to_string());
        registry.remove(b);

        let ids: Vec<MatchId> = registry.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_match_to_json() {
        let mut registry = MatchRegistry::new();
        let id = registry.create("alice".to_string(), "chan-1".to_string());
        let json = registry.get(id).unwrap().to_json();

        assert_eq!(json["match_id"], 1);
        assert_eq!(json["status"], "waiting");
        assert_eq!(json["players"], serde_json::json!(["alice", null]));
        assert_eq!(json["scores"], serde_json::json!([0, 0]));
        assert_eq!(registry.to_json().as_array().map(|a| a.len()), Some(1));
    }
}
