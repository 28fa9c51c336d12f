use std::path::PathBuf;

use clap::Parser;

use whist_bench::config::{BenchmarkConfig, ResolvedOutputs};
use whist_bench::logging::init_logging;
use whist_bench::runner::GameRunner;

/// Contract whist table runner.
#[derive(Debug, Parser)]
#[command(
    name = "whist-bench",
    author,
    version,
    about = "Deterministic contract whist game runner"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/whist.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Play the named seat yourself from the console.
    #[arg(long, value_name = "NAME")]
    interactive: Option<String>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(name) = cli.interactive.as_deref() {
        config.make_interactive(name)?;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let player_count = config.players.len();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let rounds = config.games.schedule.len();

    println!(
        "Loaded configuration '{run_id}' with {player_count} players ({games} game{}, {rounds} rounds each)",
        if games == 1 { "" } else { "s" }
    );

    let runner = GameRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} games → {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.results_path.display()
    );
    if let Some(path) = summary.snapshots_path.as_ref() {
        println!(
            "Play snapshots: {} rows at {}",
            summary.snapshots_written,
            path.display()
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }
    print!("{}", summary.render_table());

    Ok(())
}
