//! Console transport for the ping-pong bot.
//!
//! Reads `<author_id> <channel_id> <text...>` lines from stdin, feeds them to
//! the dispatcher as guild messages and prints replies. Useful for playing a
//! match locally without a chat connection.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use log::{error, info, warn};
use pingpong_state::{ChatEvent, CommandDispatcher, Config};

const CONFIG_ENV: &str = "PINGPONG_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const CONSOLE_GUILD: &str = "console";

fn parse_line(line: &str) -> Option<ChatEvent> {
    let mut parts = line.trim_end().splitn(3, ' ');
    let author = parts.next().filter(|s| !s.is_empty())?;
    let channel = parts.next().filter(|s| !s.is_empty())?;
    let text = parts.next()?;
    Some(ChatEvent::new(author, channel, CONSOLE_GUILD, text))
}

fn main() -> ExitCode {
    env_logger::init();

    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut dispatcher = match CommandDispatcher::from_config(&config) {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "[Pingpong] Listening on stdin (ping: {}, pong: {})",
        config.ping_prefix, config.pong_prefix
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let Some(event) = parse_line(&line) else {
            warn!("expected '<author_id> <channel_id> <text>', got {:?}", line);
            continue;
        };

        if let Some(reply) = dispatcher.handle(&event) {
            if writeln!(stdout, "[{}] {}", reply.channel_id, reply.content).is_err() {
                return ExitCode::FAILURE;
            }
        }
    }

    info!(
        "[Pingpong] Input closed with {} active matches ({} waiting for a second player)",
        dispatcher.registry().len(),
        dispatcher.registry().waiting_count()
    );
    ExitCode::SUCCESS
}
