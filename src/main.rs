//! Werewolf game-master CLI
//!
//! Runs demo matches with the random baseline actors. The engine itself
//! is actor-agnostic; this binary just wires seats to `RandomActor`.

use clap::{Parser, Subcommand};
use std::str::FromStr;
use werewolf_engine::game::{setup, GameLoop, RandomActor, VerbosityLevel};
use werewolf_engine::{EngineError, Result};

#[derive(Parser)]
#[command(name = "wgm", about = "Werewolf game-master engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a classic 12-player match with random actors
    Run {
        /// Seed for role assignment and all in-match draws
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Verbosity: silent, minimal, normal, verbose
        #[arg(long, default_value = "normal")]
        verbosity: String,

        /// Abort the match after this many engine steps
        #[arg(long, default_value_t = 10_000)]
        max_steps: u64,

        /// Dump the final game state as JSON after the match
        #[arg(long)]
        dump_state: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            seed,
            verbosity,
            max_steps,
            dump_state,
        } => run_match(seed, &verbosity, max_steps, dump_state),
    }
}

fn run_match(seed: u64, verbosity: &str, max_steps: u64, dump_state: bool) -> Result<()> {
    let verbosity = VerbosityLevel::from_str(verbosity).map_err(EngineError::InvalidAction)?;

    let mut game = setup::new_classic_game(seed);
    let seats = game.alive_ids();

    let mut game_loop = GameLoop::new(&mut game)
        .with_verbosity(verbosity)
        .with_max_steps(max_steps);
    for id in seats {
        let actor_seed = seed ^ (id.as_u32() as u64).wrapping_mul(0xA076_1D64_78BD_642F);
        game_loop = game_loop.with_actor(id, Box::new(RandomActor::new(actor_seed)));
    }

    let result = game_loop.run()?;
    println!(
        "Result: {:?} after {} day(s), {} steps",
        result.end_reason, result.days, result.steps
    );

    if dump_state {
        let json = serde_json::to_string_pretty(&game)
            .map_err(|e| EngineError::SerializationError(e.to_string()))?;
        println!("{json}");
    }
    Ok(())
}
