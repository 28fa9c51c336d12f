mod heuristic;
mod human;
mod random;

pub use heuristic::{HeuristicParams, HeuristicStrategy};
pub use human::HumanStrategy;
pub use random::RandomStrategy;

use thiserror::Error;
use whist_core::game::round::RoundState;
use whist_core::model::card::Card;
use whist_core::model::hand::Hand;
use whist_core::model::player::PlayerId;
use whist_core::model::trick::Trick;
use whist_core::model::trump::Trump;

/// Everything a seat may look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub seat: PlayerId,
    pub hand: &'a Hand,
    pub trick: &'a Trick,
    pub trump: Trump,
    pub contract: Option<u8>,
    pub trick_count: u8,
    pub cards_seen: &'a [Card],
}

impl<'a> PlayerView<'a> {
    pub fn from_round(round: &'a RoundState, seat: PlayerId) -> Self {
        let state = round.player(seat);
        Self {
            seat,
            hand: state.hand(),
            trick: round.current_trick(),
            trump: round.trump(),
            contract: state.contract(),
            trick_count: state.trick_count(),
            cards_seen: state.cards_seen(),
        }
    }

    pub fn legal_plays(&self) -> Vec<Card> {
        self.hand.legal_plays(self.trick)
    }

    pub fn is_leading(&self) -> bool {
        self.trick.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("no bid options were offered")]
    NoOptions,
    #[error("hand has no legal card to play")]
    NoLegalPlay,
    #[error("input closed before a valid choice was entered")]
    InputClosed,
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Human,
    Random,
    Heuristic,
}

impl StrategyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Human => "human",
            StrategyKind::Random => "random",
            StrategyKind::Heuristic => "heuristic",
        }
    }
}

/// The closed set of ways a seat can make decisions.
#[derive(Debug)]
pub enum Strategy {
    Human(HumanStrategy),
    Random(RandomStrategy),
    Heuristic(HeuristicStrategy),
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Human(_) => StrategyKind::Human,
            Strategy::Random(_) => StrategyKind::Random,
            Strategy::Heuristic(_) => StrategyKind::Heuristic,
        }
    }

    /// Returns a member of `options`.
    pub fn make_bid(&mut self, view: &PlayerView, options: &[u8]) -> Result<u8, StrategyError> {
        if options.is_empty() {
            return Err(StrategyError::NoOptions);
        }
        match self {
            Strategy::Human(human) => human.make_bid(view, options),
            Strategy::Random(random) => random.make_bid(options),
            Strategy::Heuristic(heuristic) => heuristic.make_bid(view, options),
        }
    }

    /// Returns a card from the seat's current legal plays.
    pub fn play_card(&mut self, view: &PlayerView) -> Result<Card, StrategyError> {
        let legal = view.legal_plays();
        if legal.is_empty() {
            return Err(StrategyError::NoLegalPlay);
        }
        match self {
            Strategy::Human(human) => human.play_card(view, &legal),
            Strategy::Random(random) => random.play_card(&legal),
            Strategy::Heuristic(heuristic) => heuristic.play_card(view, &legal),
        }
    }
}

impl From<HeuristicStrategy> for Strategy {
    fn from(value: HeuristicStrategy) -> Self {
        Strategy::Heuristic(value)
    }
}

impl From<RandomStrategy> for Strategy {
    fn from(value: RandomStrategy) -> Self {
        Strategy::Random(value)
    }
}

impl From<HumanStrategy> for Strategy {
    fn from(value: HumanStrategy) -> Self {
        Strategy::Human(value)
    }
}
