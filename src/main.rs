mod console;
mod game;
mod minimax;
mod tic_tac_toe;

use std::io;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::console::{Console, Mode};

/// Tic-tac-toe in the terminal, against a friend or an unbeatable CPU.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Skip the mode prompt
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Seed for the CPU's opening move
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::debug!("{:?}", args);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    console.run(args.mode, &mut rng)
}
