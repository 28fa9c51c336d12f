use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use whist_bot::{
    HeuristicParams, HeuristicStrategy, HumanStrategy, RandomStrategy, Strategy, StrategyKind,
};
use whist_core::game::round::RoundResult;
use whist_core::game::schedule::RoundSchedule;
use whist_core::game::snapshot::{PlayObserver, PlaySnapshot};
use whist_core::model::card::Card;

use crate::config::{BenchmarkConfig, PlayerConfig, PlayerKind, ResolvedOutputs};
use crate::table::{GameOutcome, Seat, Table, TableError};

/// Plays the configured number of games and streams their results to disk.
pub struct GameRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    players: Vec<PlayerBlueprint>,
    schedule: RoundSchedule,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub snapshots_written: usize,
    pub results_path: PathBuf,
    pub snapshots_path: Option<PathBuf>,
    pub players: Vec<PlayerSummary>,
}

/// Aggregate over every game for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub name: String,
    pub kind: PlayerKind,
    pub games: usize,
    pub wins: usize,
    pub total_points: u64,
    pub rounds: usize,
    pub contracts_made: usize,
}

impl PlayerSummary {
    pub fn average_points(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_points as f64 / self.games as f64
        }
    }

    pub fn contract_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.contracts_made as f64 / self.rounds as f64
        }
    }
}

impl RunSummary {
    /// Plain-text standings, one line per player.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<16} {:<10} {:>6} {:>10} {:>9}",
            "player", "kind", "wins", "avg pts", "made %"
        );
        for player in &self.players {
            let _ = writeln!(
                out,
                "{:<16} {:<10} {:>6} {:>10.2} {:>8.1}%",
                player.name,
                StrategyKind::from(player.kind).as_str(),
                player.wins,
                player.average_points(),
                player.contract_rate() * 100.0
            );
        }
        out
    }
}

impl GameRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let players = PlayerBlueprint::from_configs(&config.players)?;
        let schedule = config.schedule();
        Ok(Self {
            config,
            outputs,
            players,
            schedule,
        })
    }

    /// Execute every game, writing one JSONL row per player per game.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.results_jsonl.parent())?;
        let mut results = BufWriter::new(File::create(&self.outputs.results_jsonl)?);
        let mut snapshots = match self.outputs.snapshots_jsonl.as_ref() {
            Some(path) => {
                ensure_parent(path.parent())?;
                Some(BufWriter::new(File::create(path)?))
            }
            None => None,
        };

        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut summaries: Vec<PlayerSummary> = self
            .players
            .iter()
            .map(|player| PlayerSummary {
                name: player.name.clone(),
                kind: player.kind(),
                games: 0,
                wins: 0,
                total_points: 0,
                rounds: 0,
                contracts_made: 0,
            })
            .collect();
        let mut rows_written = 0usize;
        let mut snapshots_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let seats = self
                .players
                .iter()
                .enumerate()
                .map(|(index, player)| player.spawn_seat(game_seed, index))
                .collect();
            let mut table = Table::new(seats)?;
            let mut harvester = SnapshotHarvester::new(snapshots.is_some());

            let outcome = table.play_game(&self.schedule, game_seed, &mut harvester)?;
            event!(
                target: "whist_bench::runner",
                Level::INFO,
                run_id = %self.config.run_id,
                game = game_index,
                game_seed,
                rounds = outcome.rounds.len()
            );

            rows_written += write_game_rows(
                &mut results,
                &self.config.run_id,
                game_index,
                &outcome,
                &self.players,
            )?;
            if let Some(writer) = snapshots.as_mut() {
                snapshots_written += harvester.write_rows(
                    writer,
                    &self.config.run_id,
                    game_index,
                    &self.players,
                )?;
            }
            record_game(&mut summaries, &outcome);
        }

        results.flush()?;
        if let Some(writer) = snapshots.as_mut() {
            writer.flush()?;
        }

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            snapshots_written,
            results_path: self.outputs.results_jsonl.clone(),
            snapshots_path: self.outputs.snapshots_jsonl.clone(),
            players: summaries,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn record_game(summaries: &mut [PlayerSummary], outcome: &GameOutcome) {
    let winner = outcome.winner().map(|total| total.name.as_str());
    for (summary, total) in summaries.iter_mut().zip(&outcome.totals) {
        summary.games += 1;
        summary.total_points += u64::from(total.points);
        summary.rounds += outcome.rounds.len();
        summary.contracts_made += total.contracts_made;
        if winner == Some(total.name.as_str()) {
            summary.wins += 1;
        }
    }
}

fn write_game_rows(
    writer: &mut impl Write,
    run_id: &str,
    game_index: usize,
    outcome: &GameOutcome,
    players: &[PlayerBlueprint],
) -> Result<usize, RunnerError> {
    let winner = outcome.winner().map(|total| total.name.as_str());
    let mut rows_written = 0usize;
    for (seat, total) in outcome.totals.iter().enumerate() {
        let row = ResultRow {
            run_id,
            game: game_index,
            game_seed: outcome.seed,
            seat,
            player: &total.name,
            kind: players[seat].kind(),
            points: total.points,
            rounds: outcome.rounds.len(),
            contracts_made: total.contracts_made,
            won: winner == Some(total.name.as_str()),
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

#[derive(Serialize)]
struct ResultRow<'a> {
    run_id: &'a str,
    game: usize,
    game_seed: u64,
    seat: usize,
    player: &'a str,
    kind: PlayerKind,
    points: u32,
    rounds: usize,
    contracts_made: usize,
    won: bool,
}

#[derive(Serialize)]
struct SnapshotRow<'a> {
    run_id: &'a str,
    game: usize,
    round: usize,
    name: &'a str,
    #[serde(flatten)]
    snapshot: &'a PlaySnapshot,
    chosen: Card,
    contract_made: bool,
}

/// Buffers each round's snapshots until the round is scored, then labels them
/// with whether the acting seat made its contract.
struct SnapshotHarvester {
    enabled: bool,
    rounds_seen: usize,
    pending: Vec<(PlaySnapshot, Card)>,
    labelled: Vec<LabelledPlay>,
}

struct LabelledPlay {
    round: usize,
    snapshot: PlaySnapshot,
    chosen: Card,
    contract_made: bool,
}

impl SnapshotHarvester {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            rounds_seen: 0,
            pending: Vec::new(),
            labelled: Vec::new(),
        }
    }

    fn write_rows(
        &mut self,
        writer: &mut impl Write,
        run_id: &str,
        game_index: usize,
        players: &[PlayerBlueprint],
    ) -> Result<usize, RunnerError> {
        let rows = self.labelled.len();
        for play in self.labelled.drain(..) {
            let row = SnapshotRow {
                run_id,
                game: game_index,
                round: play.round,
                name: &players[play.snapshot.player.index()].name,
                snapshot: &play.snapshot,
                chosen: play.chosen,
                contract_made: play.contract_made,
            };
            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
        }
        Ok(rows)
    }
}

impl PlayObserver for SnapshotHarvester {
    fn observe(&mut self, snapshot: &PlaySnapshot, chosen: Card) {
        if self.enabled {
            self.pending.push((snapshot.clone(), chosen));
        }
    }

    fn round_complete(&mut self, result: &RoundResult) {
        self.rounds_seen += 1;
        let round = self.rounds_seen;
        for (snapshot, chosen) in self.pending.drain(..) {
            let contract_made = result
                .seats
                .get(snapshot.player.index())
                .is_some_and(|seat| seat.contract_made());
            self.labelled.push(LabelledPlay {
                round,
                snapshot,
                chosen,
                contract_made,
            });
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Player(#[from] PlayerError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Table(#[from] TableError),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("invalid heuristic parameter for player '{name}': {message}")]
    InvalidHeuristicParam { name: String, message: String },
    #[error("invalid random parameter for player '{name}': {message}")]
    InvalidRandomParam { name: String, message: String },
}

impl From<PlayerKind> for StrategyKind {
    fn from(kind: PlayerKind) -> Self {
        match kind {
            PlayerKind::Human => StrategyKind::Human,
            PlayerKind::Random => StrategyKind::Random,
            PlayerKind::Heuristic => StrategyKind::Heuristic,
        }
    }
}

/// Parsed player definition; spawns a fresh strategy for every game.
struct PlayerBlueprint {
    name: String,
    implementation: PlayerImplementation,
}

enum PlayerImplementation {
    Human,
    Random(RandomOptions),
    Heuristic(HeuristicParams),
}

impl PlayerBlueprint {
    fn from_configs(configs: &[PlayerConfig]) -> Result<Vec<Self>, PlayerError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &PlayerConfig) -> Result<Self, PlayerError> {
        let implementation = match config.kind {
            PlayerKind::Human => PlayerImplementation::Human,
            PlayerKind::Random => {
                PlayerImplementation::Random(RandomOptions::from_params(&config.name, &config.params)?)
            }
            PlayerKind::Heuristic => {
                PlayerImplementation::Heuristic(heuristic_from_params(&config.name, &config.params)?)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    fn kind(&self) -> PlayerKind {
        match self.implementation {
            PlayerImplementation::Human => PlayerKind::Human,
            PlayerImplementation::Random(_) => PlayerKind::Random,
            PlayerImplementation::Heuristic(_) => PlayerKind::Heuristic,
        }
    }

    fn spawn_seat(&self, game_seed: u64, seat_index: usize) -> Seat {
        let strategy: Strategy = match &self.implementation {
            PlayerImplementation::Human => HumanStrategy::stdio(self.name.clone()).into(),
            PlayerImplementation::Random(options) => {
                RandomStrategy::with_seed(options.seed_for(game_seed, seat_index)).into()
            }
            PlayerImplementation::Heuristic(params) => HeuristicStrategy::new(*params).into(),
        };
        Seat::new(self.name.clone(), strategy)
    }
}

struct RandomOptions {
    seed: Option<u64>,
}

impl RandomOptions {
    fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, PlayerError> {
        if params.is_null() {
            return Ok(Self { seed: None });
        }

        let mapping = params
            .as_mapping()
            .ok_or_else(|| PlayerError::InvalidRandomParam {
                name: name.to_string(),
                message: "expected mapping for random params".to_string(),
            })?;

        let mut seed = None;
        for (key, value) in mapping {
            match key.as_str() {
                Some("seed") => {
                    seed = Some(value.as_u64().ok_or_else(|| PlayerError::InvalidRandomParam {
                        name: name.to_string(),
                        message: "seed must be a non-negative integer".to_string(),
                    })?);
                }
                other => {
                    return Err(PlayerError::InvalidRandomParam {
                        name: name.to_string(),
                        message: format!("unknown parameter {other:?}"),
                    });
                }
            }
        }
        Ok(Self { seed })
    }

    /// Each seat gets its own stream, and each game a fresh one.
    fn seed_for(&self, game_seed: u64, seat_index: usize) -> u64 {
        match self.seed {
            Some(seed) => seed ^ game_seed,
            None => game_seed.wrapping_add(seat_index as u64 + 1),
        }
    }
}

fn heuristic_from_params(
    name: &str,
    params: &serde_yaml::Value,
) -> Result<HeuristicParams, PlayerError> {
    let mut parsed = HeuristicParams::default();
    if params.is_null() {
        return Ok(parsed);
    }

    let invalid = |message: String| PlayerError::InvalidHeuristicParam {
        name: name.to_string(),
        message,
    };
    let mapping = params
        .as_mapping()
        .ok_or_else(|| invalid("expected mapping for heuristic params".to_string()))?;

    for (key, value) in mapping {
        match key.as_str() {
            Some("trump_multiplier") => {
                parsed.trump_multiplier = value
                    .as_f64()
                    .ok_or_else(|| invalid("trump_multiplier must be a number".to_string()))?;
            }
            Some("card_multiplier") => {
                parsed.card_multiplier = value
                    .as_f64()
                    .ok_or_else(|| invalid("card_multiplier must be a number".to_string()))?;
            }
            Some("card_cutoff") => {
                parsed.card_cutoff = value
                    .as_u64()
                    .filter(|cutoff| *cutoff <= 14)
                    .map(|cutoff| cutoff as u8)
                    .ok_or_else(|| invalid("card_cutoff must be a rank value up to 14".to_string()))?;
            }
            other => return Err(invalid(format!("unknown parameter {other:?}"))),
        }
    }
    Ok(parsed)
}
