//! Plays Lycan in one terminal: every player types into the same stdin.
//!
//! A line is `<user> <text>` to speak in the group, or `@<user> <text>`
//! to answer the bot privately. Before a game, the group commands
//! `join`, `leave`, `players` and `start` manage the table; `end` stops
//! a running game.
//!
//! ```text
//! cargo run -p lycan-terminal -- [config.json]
//! ```

use std::sync::Arc;

use lycan::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
struct Line {
    user: UserId,
    private: bool,
    text: String,
}

fn parse_line(raw: &str) -> Option<Line> {
    let (head, text) = raw.trim().split_once(char::is_whitespace)?;
    let (private, user) = match head.strip_prefix('@') {
        Some(user) => (true, user),
        None => (false, head),
    };
    Some(Line {
        user: user.parse().ok()?,
        private,
        text: text.trim().to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// Who sits at the table before the game starts, in join order.
#[derive(Debug, Default)]
struct Lobby {
    seats: Vec<UserId>,
}

impl Lobby {
    fn join(&mut self, user: UserId) -> bool {
        if self.seats.contains(&user) {
            return false;
        }
        self.seats.push(user);
        true
    }

    fn leave(&mut self, user: &UserId) -> bool {
        let before = self.seats.len();
        self.seats.retain(|seat| seat != user);
        self.seats.len() != before
    }

    /// Display names are the user ids.
    fn roster(&self) -> Vec<(UserId, String)> {
        self.seats
            .iter()
            .map(|user| (user.clone(), user.to_string()))
            .collect()
    }

    fn names(&self) -> String {
        self.seats
            .iter()
            .map(UserId::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn render(out: &Outgoing) -> String {
    let prefix = match &out.target {
        Target::Group(group) => format!("[{group}]"),
        Target::User(user) => format!("[to {user}]"),
    };
    out.text
        .lines()
        .map(|line| format!("{prefix} {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    // Game text goes to stdout; keep logs on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_path(&path)?.validated()?,
        None => GameConfig::default(),
    };
    let (transport, mut outbox) = MemoryTransport::new();
    let manager = GameManager::new(Arc::new(transport), Arc::new(InputStore::new()), config);
    let group = GroupId::from("terminal");

    tokio::spawn(async move {
        while let Some(out) = outbox.recv().await {
            println!("{}", render(&out));
        }
    });

    println!("Type `<user> join` for each player, then `<user> start`.");
    let mut lobby = Lobby::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(raw) = lines.next_line().await? {
        if raw.trim().is_empty() {
            continue;
        }
        let Some(line) = parse_line(&raw) else {
            eprintln!("expected `<user> <text>` or `@<user> <text>`");
            continue;
        };
        if line.private {
            manager.deliver(&line.user, None, line.text);
            continue;
        }

        let running = manager.is_running(&group);
        match Intent::parse(&line.text) {
            Intent::Join if !running => {
                if lobby.join(line.user.clone()) {
                    println!("{} joined. Seated: {}", line.user, lobby.names());
                }
            }
            Intent::Leave if !running => {
                if lobby.leave(&line.user) {
                    println!("{} left. Seated: {}", line.user, lobby.names());
                }
            }
            Intent::ListPlayers if running => match manager.players_of(&group) {
                Ok(players) => {
                    let alive: Vec<String> = players
                        .into_iter()
                        .filter(|p| p.alive)
                        .map(|p| p.name)
                        .collect();
                    println!("Alive: {}", alive.join(", "));
                }
                Err(err) => eprintln!("{err}"),
            },
            Intent::ListPlayers => println!("Seated: {}", lobby.names()),
            Intent::AdminStart if !running => match manager.start(group.clone(), lobby.roster()) {
                Ok(handle) => {
                    tokio::spawn(async move {
                        match handle.await {
                            Ok(Ok(status)) => println!("-- {status} won --"),
                            Ok(Err(err)) => println!("-- game ended: {err} --"),
                            Err(err) => tracing::error!(error = %err, "game task failed"),
                        }
                    });
                }
                Err(err) => eprintln!("cannot start: {err}"),
            },
            Intent::AdminEnd => {
                if let Err(err) = manager.terminate(&group) {
                    eprintln!("{err}");
                }
            }
            _ => {
                manager.deliver(&line.user, Some(&group), line.text);
            }
        }
    }

    for running in manager.running_groups() {
        let _ = manager.terminate(&running);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_group_and_private() {
        let line = parse_line("u1 hello there").unwrap();
        assert_eq!(line.user, UserId::from("u1"));
        assert!(!line.private);
        assert_eq!(line.text, "hello there");

        let line = parse_line("@u2 3").unwrap();
        assert_eq!(line.user, UserId::from("u2"));
        assert!(line.private);
        assert_eq!(line.text, "3");
    }

    #[test]
    fn test_parse_line_rejects_missing_text() {
        assert!(parse_line("u1").is_none());
        assert!(parse_line("@ hi").is_none());
    }

    #[test]
    fn test_lobby_join_leave() {
        let mut lobby = Lobby::default();
        assert!(lobby.join(UserId::from("u1")));
        assert!(!lobby.join(UserId::from("u1")));
        assert!(lobby.join(UserId::from("u2")));
        assert_eq!(lobby.names(), "u1, u2");
        assert!(lobby.leave(&UserId::from("u1")));
        assert!(!lobby.leave(&UserId::from("u1")));
        assert_eq!(lobby.roster(), vec![(UserId::from("u2"), "u2".to_owned())]);
    }

    #[test]
    fn test_render_prefixes_every_line() {
        let out = Outgoing {
            receipt: lycan::Receipt {
                message_id: 1,
                target: Target::User(UserId::from("u1")),
            },
            target: Target::User(UserId::from("u1")),
            text: "a\nb".into(),
        };
        assert_eq!(render(&out), "[to u1] a\n[to u1] b");
    }
}
