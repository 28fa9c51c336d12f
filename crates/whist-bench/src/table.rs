use std::collections::HashSet;

use thiserror::Error;
use tracing::{Level, event};
use whist_bot::{PlayerView, Strategy, StrategyError, StrategyKind};
use whist_core::game::match_state::{MatchError, MatchState};
use whist_core::game::round::{PlayError, PlayOutcome, RoundResult};
use whist_core::game::schedule::RoundSchedule;
use whist_core::game::snapshot::PlayObserver;
use whist_core::model::bidding::BidError;
use whist_core::model::player::PlayerId;

/// A named seat and whatever makes its decisions.
#[derive(Debug)]
pub struct Seat {
    pub name: String,
    pub strategy: Strategy,
}

impl Seat {
    pub fn new(name: impl Into<String>, strategy: impl Into<Strategy>) -> Self {
        Self {
            name: name.into(),
            strategy: strategy.into(),
        }
    }
}

/// Seats in table order. Seat 0 leads the first round; the last seat deals it.
#[derive(Debug)]
pub struct Table {
    seats: Vec<Seat>,
}

/// Per-player totals after a full schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTotal {
    pub name: String,
    pub kind: StrategyKind,
    pub points: u32,
    pub contracts_made: usize,
}

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub seed: u64,
    pub rounds: Vec<RoundResult>,
    pub totals: Vec<PlayerTotal>,
}

impl GameOutcome {
    /// Final points keyed by player name, in seat order.
    pub fn points_by_name(&self) -> Vec<(&str, u32)> {
        self.totals
            .iter()
            .map(|total| (total.name.as_str(), total.points))
            .collect()
    }

    /// Highest total; ties go to the earlier seat.
    pub fn winner(&self) -> Option<&PlayerTotal> {
        self.totals
            .iter()
            .rev()
            .max_by_key(|total| total.points)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("a table needs at least two seats but found {found}")]
    TooFewSeats { found: usize },
    #[error("seat name '{0}' used more than once")]
    DuplicateName(String),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("bid rejected: {0}")]
    Bid(#[from] BidError),
    #[error("play rejected: {0}")]
    Play(#[from] PlayError),
    #[error("'{name}' could not decide")]
    Strategy {
        name: String,
        #[source]
        source: StrategyError,
    },
}

impl Table {
    pub fn new(seats: Vec<Seat>) -> Result<Self, TableError> {
        if seats.len() < 2 {
            return Err(TableError::TooFewSeats { found: seats.len() });
        }
        let mut seen = HashSet::new();
        for seat in &seats {
            if !seen.insert(seat.name.as_str()) {
                return Err(TableError::DuplicateName(seat.name.clone()));
            }
        }
        Ok(Self { seats })
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Plays every round of `schedule` from a deck seeded with `seed`.
    ///
    /// `observer` sees each seat's snapshot before its card is played and every
    /// scored round afterwards.
    pub fn play_game<O: PlayObserver + ?Sized>(
        &mut self,
        schedule: &RoundSchedule,
        seed: u64,
        observer: &mut O,
    ) -> Result<GameOutcome, TableError> {
        let mut state = MatchState::with_seed(self.seats.len(), schedule.clone(), seed)?;

        while !state.is_game_over() {
            self.bid_round(&mut state)?;
            self.play_round(&mut state, observer)?;

            let round_number = state.round_number();
            let result = state.finish_round_and_start_next()?;
            self.log_round(round_number, &result);
            observer.round_complete(&result);
        }

        let totals = self
            .seats
            .iter()
            .enumerate()
            .map(|(index, seat)| {
                let player = PlayerId::new(index as u8);
                PlayerTotal {
                    name: seat.name.clone(),
                    kind: seat.strategy.kind(),
                    points: state.scores().score(player),
                    contracts_made: state
                        .history()
                        .iter()
                        .filter(|round| round.seats[index].contract_made())
                        .count(),
                }
            })
            .collect();

        let outcome = GameOutcome {
            seed,
            rounds: state.history().to_vec(),
            totals,
        };
        if let Some(winner) = outcome.winner() {
            event!(
                target: "whist_bench::table",
                Level::INFO,
                seed,
                rounds = outcome.rounds.len(),
                winner = %winner.name,
                points = winner.points
            );
        }
        Ok(outcome)
    }

    fn bid_round(&mut self, state: &mut MatchState) -> Result<(), TableError> {
        while let Some(seat) = state.round().next_bidder() {
            let round = state.round();
            let options = round.bid_options()?;
            let view = PlayerView::from_round(round, seat);
            let entry = &mut self.seats[seat.index()];
            let bid = entry
                .strategy
                .make_bid(&view, &options)
                .map_err(|source| TableError::Strategy {
                    name: entry.name.clone(),
                    source,
                })?;

            event!(
                target: "whist_bench::table",
                Level::DEBUG,
                round = state.round_number(),
                player = %entry.name,
                bid,
                options = ?options
            );
            state.round_mut().submit_bid(seat, bid)?;
        }
        Ok(())
    }

    fn play_round<O: PlayObserver + ?Sized>(
        &mut self,
        state: &mut MatchState,
        observer: &mut O,
    ) -> Result<(), TableError> {
        while let Some(seat) = state.round().expected_player() {
            let round = state.round();
            let view = PlayerView::from_round(round, seat);
            let entry = &mut self.seats[seat.index()];
            let card = entry
                .strategy
                .play_card(&view)
                .map_err(|source| TableError::Strategy {
                    name: entry.name.clone(),
                    source,
                })?;
            observer.observe(&round.snapshot(seat), card);

            event!(
                target: "whist_bench::table",
                Level::DEBUG,
                round = state.round_number(),
                player = %entry.name,
                card = %card
            );
            if let PlayOutcome::TrickCompleted { winner, .. } =
                state.round_mut().play_card(seat, card)?
            {
                event!(
                    target: "whist_bench::table",
                    Level::DEBUG,
                    round = state.round_number(),
                    winner = %self.seats[winner.index()].name
                );
            }
        }
        Ok(())
    }

    fn log_round(&self, round_number: usize, result: &RoundResult) {
        if !tracing::enabled!(target: "whist_bench::table", Level::DEBUG) {
            return;
        }
        for seat in &result.seats {
            event!(
                target: "whist_bench::table",
                Level::DEBUG,
                round = round_number,
                hand_size = result.hand_size,
                trump = %result.trump,
                player = %self.seats[seat.player.index()].name,
                bid = seat.bid,
                tricks = seat.tricks,
                points = seat.points
            );
        }
    }
}
