//! Command-line configuration of the `tabula` binary.

use clap::Parser;

use crate::chess::core::Player;

/// Plays chess by the rules in the terminal: click squares or type moves.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about)]
pub struct Config {
    /// Side that makes the first move: white (w) or black (b).
    #[arg(long, default_value = "white", value_parser = parse_player)]
    pub first_player: Player,
    /// Log filter in `tracing_subscriber::EnvFilter` syntax. `RUST_LOG` takes
    /// precedence when set.
    #[arg(long, default_value = "warn")]
    pub log: String,
    /// Do not print the version banner on startup.
    #[arg(long)]
    pub no_banner: bool,
}

fn parse_player(text: &str) -> anyhow::Result<Player> {
    Player::try_from(text)
}
