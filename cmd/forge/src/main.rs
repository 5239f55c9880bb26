//! Forge CLI - LLM-driven game synthesis and agent-creation pipeline.
//!
//! Commands:
//! - `forge create` - Run the full design -> synthesize -> select pipeline
//! - `forge synthesize` - Draft and validate game module source for one game
//! - `forge judge` - Compare a candidate's transcript against its rules
//! - `forge heuristics` - Draft one scoring function from a policy description
//! - `forge optimize` - Run feature selection over a persisted ensemble
//! - `forge replay` - Run the offline simulation scenarios

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod fixtures;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "LLM-driven game synthesis and agent-creation pipeline")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full design -> synthesize -> fix-by-playing -> select pipeline
    Create {
        /// Built-in game identifier (only "high-card" exists today)
        #[arg(short, long, default_value = "high-card")]
        game: String,

        /// Path to a rules text file
        #[arg(short, long)]
        rules: String,

        /// One-line description of the game
        #[arg(long)]
        game_description: String,

        /// One-line description of the observation/action shapes
        #[arg(long)]
        io_description: String,

        /// Scratch directory for transcripts and intermediate artifacts
        #[arg(short, long, default_value = "scratch")]
        scratch_dir: String,

        /// Output path for the persisted ensemble JSON
        #[arg(short, long, default_value = "ensemble.json")]
        output: String,
    },

    /// Draft and validate game module source for one game
    Synthesize {
        /// Built-in game identifier (only "high-card" exists today)
        #[arg(short, long, default_value = "high-card")]
        game: String,

        /// Path to a rules text file
        #[arg(short, long)]
        rules: String,

        /// Scratch directory for synthesis checkpoints
        #[arg(short, long, default_value = "scratch")]
        scratch_dir: String,

        /// Output path for the final candidate source
        #[arg(short, long, default_value = "candidate.rs")]
        output: String,
    },

    /// Compare a candidate's transcript against its rules text
    Judge {
        /// Path to a rules text file
        #[arg(short, long)]
        rules: String,

        /// Path to the candidate source file
        #[arg(short, long)]
        source: String,

        /// Path to the transcript file
        #[arg(short, long)]
        transcript: String,

        /// Output path for patched source, if the verdict is a patch
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Draft one scoring function from a policy description
    Heuristics {
        /// One-line description of the game
        #[arg(long)]
        game_description: String,

        /// Natural language scoring policy
        #[arg(short, long)]
        policy: String,

        /// One-line description of the observation/action shapes
        #[arg(long)]
        io_description: String,

        /// Keep the function active and attempt self-repair on compile failure
        #[arg(long)]
        enable_fix: bool,

        /// Output path for the persisted heuristic function JSON
        #[arg(short, long, default_value = "heuristic.json")]
        output: String,
    },

    /// Run feature selection over a persisted ensemble's heuristic pool
    Optimize {
        /// Built-in game identifier (only "high-card" exists today)
        #[arg(short, long, default_value = "high-card")]
        game: String,

        /// Path to a persisted ensemble JSON file
        #[arg(short, long)]
        ensemble: String,

        /// Scratch directory for tournament transcripts
        #[arg(short, long, default_value = "scratch")]
        scratch_dir: String,

        /// Path to the selection history JSON file
        #[arg(long, default_value = "selection_history.json")]
        history: String,

        /// Base RNG seed for the tournament
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output path for the optimized ensemble JSON
        #[arg(short, long, default_value = "ensemble.optimized.json")]
        output: String,
    },

    /// Run the offline simulation scenarios
    Replay {
        /// RNG seed for the simulation run
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Scratch directory for simulation transcripts
        #[arg(short, long, default_value = "scratch")]
        scratch_dir: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Create {
            game,
            rules,
            game_description,
            io_description,
            scratch_dir,
            output,
        } => commands::create::run(&game, &rules, &game_description, &io_description, &scratch_dir, &output).await,
        Commands::Synthesize { game, rules, scratch_dir, output } => commands::synthesize::run(&game, &rules, &scratch_dir, &output).await,
        Commands::Judge { rules, source, transcript, output } => commands::judge::run(&rules, &source, &transcript, output.as_deref()).await,
        Commands::Heuristics {
            game_description,
            policy,
            io_description,
            enable_fix,
            output,
        } => commands::heuristics::run(&game_description, &policy, &io_description, enable_fix, &output).await,
        Commands::Optimize {
            game,
            ensemble,
            scratch_dir,
            history,
            seed,
            output,
        } => commands::optimize::run(&game, &ensemble, &scratch_dir, &history, seed, &output),
        Commands::Replay { seed, scratch_dir } => commands::replay::run(seed, &scratch_dir),
    }
}
