use std::io;
use std::path::PathBuf;

use anyhow::Result;
use arcade_core::StatsStore;
use clap::Parser;

mod menu;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where career stats are kept
    #[arg(long, default_value = StatsStore::DEFAULT_FILE_NAME)]
    stats_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");
    log::debug!("stats file: {:?}", args.stats_file);

    let store = StatsStore::new(args.stats_file);
    let mut arcade = menu::Arcade::new(&store, seed, io::stdin().lock(), io::stdout().lock());
    arcade.run()
}
