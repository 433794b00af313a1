//! Inbound chat events and trigger parsing.

use regex::Regex;

/// A chat message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub author_id: String,
    pub channel_id: String,
    /// `None` for direct messages
    pub guild_id: Option<String>,
    pub text: String,
    /// Message was sent by the bot itself
    pub is_self: bool,
}

impl ChatEvent {
    /// A guild message from another user.
    pub fn new(
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        guild_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            channel_id: channel_id.into(),
            guild_id: Some(guild_id.into()),
            text: text.into(),
            is_self: false,
        }
    }
}

/// Which trigger token opened the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Ping,
    Pong,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Pong => "pong",
        }
    }
}

/// A parsed trigger message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub trigger: Trigger,
    /// Free text after the token; empty when absent
    pub payload: String,
}

impl Command {
    pub fn is_exit(&self) -> bool {
        self.payload.eq_ignore_ascii_case("exit")
    }
}

/// Matches `<ping>`, `<pong>`, and either followed by whitespace and a payload.
#[derive(Debug, Clone)]
pub struct TriggerGrammar {
    ping: String,
    pong: String,
    pattern: Regex,
}

impl TriggerGrammar {
    pub fn new(ping: &str, pong: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"^({}|{})(?:\s+(.+))?$",
            regex::escape(ping),
            regex::escape(pong)
        ))?;

        Ok(Self {
            ping: ping.to_string(),
            pong: pong.to_string(),
            pattern,
        })
    }

    pub fn ping_token(&self) -> &str {
        &self.ping
    }

    pub fn pong_token(&self) -> &str {
        &self.pong
    }

    /// Parse a message, returning `None` if it is not a trigger.
    pub fn parse(&self, text: &str) -> Option<Command> {
        let caps = self.pattern.captures(text)?;
        let token = caps.get(1)?.as_str();

        let trigger = if token == self.ping {
            Trigger::Ping
        } else if token == self.pong {
            Trigger::Pong
        } else {
            return None;
        };

        Some(Command {
            trigger,
            payload: caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}
