use std::io::{self, BufWriter};

use clap::Parser;
use tabula::{Config, Session};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    if !config.no_banner {
        tabula::print_banner();
    }
    tracing::info!(?config, "starting session");
    let mut input = io::stdin().lock();
    let mut output = BufWriter::new(io::stdout().lock());
    Session::new(config.first_player, &mut input, &mut output).run()
}
