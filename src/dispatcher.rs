//! Command dispatch.
//!
//! Interprets chat events against the match registry. Every event produces at
//! most one reply; rule violations become an error reply addressed to the
//! author and leave the match untouched.

use log::{debug, info, warn};
use thiserror::Error;

use crate::command::{ChatEvent, Command, Trigger, TriggerGrammar};
use crate::config::{channel_allowed, Config, ConfigError};
use crate::hit::{HitOutcome, HitResolver};
use crate::mention::{mention_tag, DirectoryError, TagDirectory, UserDirectory};
use crate::state::game::{MatchError, MatchId, MatchRegistry};

/// Errors reported back to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("it's not your turn")]
    WrongTurn,
    #[error("can't ping yet, waiting for player 2")]
    NotStarted,
    #[error("no ping-pong games to join")]
    NoAvailableGames,
    #[error("can't play by yourself, sorry")]
    SelfPlay,
    #[error(transparent)]
    InvalidJoin(#[from] MatchError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

impl From<DirectoryError> for CommandError {
    fn from(err: DirectoryError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Text to post back to the originating channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub channel_id: String,
    pub content: String,
}

/// Owns the match registry and applies the ping/pong protocol to it.
#[derive(Debug)]
pub struct CommandDispatcher<D = TagDirectory> {
    grammar: TriggerGrammar,
    channel_whitelist: Vec<String>,
    registry: MatchRegistry,
    resolver: HitResolver,
    directory: D,
}

impl CommandDispatcher<TagDirectory> {
    pub fn new(grammar: TriggerGrammar) -> Self {
        Self {
            grammar,
            channel_whitelist: Vec::new(),
            registry: MatchRegistry::new(),
            resolver: HitResolver::new(),
            directory: TagDirectory,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.grammar()?).with_whitelist(config.channel_whitelist.clone()))
    }
}

impl<D: UserDirectory> CommandDispatcher<D> {
    /// Restrict handling to these channels; empty allows all.
    pub fn with_whitelist(mut self, channels: Vec<String>) -> Self {
        self.channel_whitelist = channels;
        self
    }

    pub fn with_resolver(mut self, resolver: HitResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_directory<D2: UserDirectory>(self, directory: D2) -> CommandDispatcher<D2> {
        CommandDispatcher {
            grammar: self.grammar,
            channel_whitelist: self.channel_whitelist,
            registry: self.registry,
            resolver: self.resolver,
            directory,
        }
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// Handle one chat event. Returns `None` for events that are not ours.
    pub fn handle(&mut self, event: &ChatEvent) -> Option<Reply> {
        if event.is_self || event.guild_id.is_none() {
            return None;
        }

        if !channel_allowed(&self.channel_whitelist, &event.channel_id) {
            return None;
        }

        let command = self.grammar.parse(&event.text)?;

        let content = match self.execute(event, &command) {
            Ok(content) => content,
            Err(err) => {
                if err.is_internal() {
                    warn!(
                        "[Pingpong] {} from {}: {}",
                        command.trigger.as_str(),
                        event.author_id,
                        err
                    );
                } else {
                    debug!(
                        "[Pingpong] Rejected {} from {}: {}",
                        command.trigger.as_str(),
                        event.author_id,
                        err
                    );
                }
                format!("❌ {} {}", mention_tag(&event.author_id), err)
            }
        };

        Some(Reply {
            channel_id: event.channel_id.clone(),
            content,
        })
    }

    fn execute(&mut self, event: &ChatEvent, command: &Command) -> Result<String, CommandError> {
        let author_id = event.author_id.as_str();
        let existing = self.registry.find_by_participant(author_id).map(|m| m.id);

        let id = match (existing, command.trigger) {
            (Some(id), _) if command.is_exit() => return self.end_match(id),
            (Some(id), _) => id,
            (None, Trigger::Ping) => return Ok(self.create_match(event)),
            (None, Trigger::Pong) => return self.join_match(author_id),
        };

        let game = self
            .registry
            .get(id)
            .ok_or_else(|| CommandError::Internal(format!("{} is no longer registered", id)))?;

        match command.trigger {
            Trigger::Ping => {
                if !game.is_started() {
                    return Err(CommandError::NotStarted);
                }
                if game.last_hit_was_ping() {
                    return Err(CommandError::WrongTurn);
                }
            }
            Trigger::Pong => {
                if game.second_player().is_none() && game.first_player() == author_id {
                    return Err(CommandError::SelfPlay);
                }
                if !game.last_hit_was_ping() {
                    return Err(CommandError::WrongTurn);
                }
            }
        }

        self.play_hit(id, author_id, &command.payload)
    }

    fn create_match(&mut self, event: &ChatEvent) -> String {
        let id = self
            .registry
            .create(event.author_id.clone(), event.channel_id.clone());
        info!(
            "[Pingpong] {} created by {} in channel {}",
            id, event.author_id, event.channel_id
        );

        format!(
            "ℹ {} started a game, waiting for player 2 to respond with {}",
            mention_tag(&event.author_id),
            self.grammar.pong_token()
        )
    }

    fn join_match(&mut self, author_id: &str) -> Result<String, CommandError> {
        let game = self
            .registry
            .find_joinable_mut()
            .ok_or(CommandError::NoAvailableGames)?;
        let server = self.directory.mention(game.first_player())?;

        game.join(author_id.to_string())?;
        info!("[Pingpong] {} joined {}", author_id, game.id);

        Ok(format!(
            "ℹ {} joined the match. {} serves.",
            mention_tag(author_id),
            server
        ))
    }

    fn end_match(&mut self, id: MatchId) -> Result<String, CommandError> {
        let game = self
            .registry
            .get(id)
            .ok_or_else(|| CommandError::Internal(format!("{} is no longer registered", id)))?;

        let mentions = game
            .participants()
            .map(|p| self.directory.mention(p))
            .collect::<Result<Vec<_>, _>>()?
            .join(" ");

        if let Some(ended) = self.registry.remove(id) {
            info!(
                "[Pingpong] {} ended after {} hits, score {}",
                ended.id,
                ended.hit_count(),
                ended.score_line()
            );
        }

        Ok(format!("ℹ {} match ended", mentions))
    }

    fn play_hit(
        &mut self,
        id: MatchId,
        author_id: &str,
        payload: &str,
    ) -> Result<String, CommandError> {
        let outcome = self.resolver.resolve(payload);
        let game = self
            .registry
            .get_mut(id)
            .ok_or_else(|| CommandError::Internal(format!("{} is no longer registered", id)))?;

        game.record_hit(outcome.success);
        debug!("[Pingpong] Hit by {}: {:?} -> {}", author_id, outcome, game.to_json());

        Ok(hit_message(&outcome, &mention_tag(author_id), &game.score_line()))
    }
}

/// Chat text for a resolved hit.
pub fn hit_message(outcome: &HitOutcome, author: &str, score_line: &str) -> String {
    if outcome.success {
        return format!(
            "✔ Ball hit {}! At {:.2}% and {:.2}%",
            author, outcome.first_bounce, outcome.second_bounce
        );
    }

    let miss = if outcome.is_too_far() {
        format!("✖ Ball hit too far (at {:.2}%) {}.", outcome.first_bounce, author)
    } else {
        format!(
            "✖ Ball hit once at {:.2}% but then it bounced too far (at {:.2}%) {}.",
            outcome.first_bounce, outcome.second_bounce, author
        )
    };

    format!("{}\n**Score:** {}", miss, score_line)
}
