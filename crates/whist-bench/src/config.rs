use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use whist_core::game::schedule::RoundSchedule;

const DEFAULT_GAME_COUNT: usize = 1;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root run configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    #[serde(default)]
    pub games: GamesConfig,
    pub players: Vec<PlayerConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_players(&mut self.players)?;
        self.games.validate(self.players.len())?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Seats `name` as a console player, keeping its place at the table.
    pub fn make_interactive(&mut self, name: &str) -> Result<(), ValidationError> {
        let player = self
            .players
            .iter_mut()
            .find(|player| player.name == name)
            .ok_or_else(|| ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("no player named '{name}' to seat interactively"),
            })?;
        player.kind = PlayerKind::Human;
        Ok(())
    }

    pub fn schedule(&self) -> RoundSchedule {
        self.games.schedule.clone()
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            results_jsonl: resolve_template(&self.run_id, &self.outputs.results_jsonl),
            snapshots_jsonl: self
                .outputs
                .snapshots_jsonl
                .as_deref()
                .map(|template| resolve_template(&self.run_id, template)),
        }
    }
}

/// How many games to play and how each one is dealt.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_game_count")]
    pub count: usize,
    #[serde(default)]
    pub schedule: RoundSchedule,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            seed: None,
            count: DEFAULT_GAME_COUNT,
            schedule: RoundSchedule::default(),
        }
    }
}

impl GamesConfig {
    fn validate(&self, players: usize) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        if self.schedule.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "games.schedule".to_string(),
                message: "schedule must list at least one hand size".to_string(),
            });
        }

        self.schedule
            .check(players)
            .map_err(|err| ValidationError::InvalidField {
                field: "games.schedule".to_string(),
                message: err.to_string(),
            })
    }
}

fn default_game_count() -> usize {
    DEFAULT_GAME_COUNT
}

/// One seat at the table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    pub name: String,
    pub kind: PlayerKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    Random,
    Heuristic,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub results_jsonl: String,
    #[serde(default)]
    pub snapshots_jsonl: Option<String>,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let mut entries = vec![("outputs.results_jsonl", self.results_jsonl.as_str())];
        if let Some(snapshots) = self.snapshots_jsonl.as_deref() {
            entries.push(("outputs.snapshots_jsonl", snapshots));
        }

        for (label, value) in entries {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_players(players: &mut [PlayerConfig]) -> Result<(), ValidationError> {
    if players.len() < 2 {
        return Err(ValidationError::InvalidField {
            field: "players".to_string(),
            message: format!("at least two players are required, found {}", players.len()),
        });
    }

    let mut seen = HashSet::new();
    for player in players.iter_mut() {
        if player.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "players.name".to_string(),
                message: "player name must not be empty".to_string(),
            });
        }

        if !seen.insert(player.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("player name '{}' defined more than once", player.name),
            });
        }

        if player.params.is_null() {
            player.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub results_jsonl: PathBuf,
    pub snapshots_jsonl: Option<PathBuf>,
}

impl ResolvedOutputs {
    /// Directory holding the results file; structured logs land next to it.
    pub fn output_dir(&self) -> PathBuf {
        self.results_jsonl
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
