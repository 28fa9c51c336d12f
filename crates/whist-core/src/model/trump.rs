use crate::model::card::Card;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The trump designation of a single round: one suit, or no trump at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Trump(Option<Suit>);

impl Trump {
    pub const NONE: Trump = Trump(None);

    /// Rotation used across rounds; restarts after no-trump.
    pub const CYCLE: [Trump; 5] = [
        Trump(Some(Suit::Club)),
        Trump(Some(Suit::Diamond)),
        Trump(Some(Suit::Heart)),
        Trump(Some(Suit::Spade)),
        Trump(None),
    ];

    pub const fn suit(suit: Suit) -> Self {
        Trump(Some(suit))
    }

    pub const fn for_round(round_index: usize) -> Self {
        Trump::CYCLE[round_index % Trump::CYCLE.len()]
    }

    pub const fn as_suit(self) -> Option<Suit> {
        self.0
    }

    pub fn is_trump(self, card: Card) -> bool {
        self.0 == Some(card.suit)
    }
}

impl From<Option<Suit>> for Trump {
    fn from(value: Option<Suit>) -> Self {
        Trump(value)
    }
}

impl FromStr for Trump {
    type Err = TrumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if matches!(
            trimmed.to_ascii_lowercase().as_str(),
            "none" | "no_trump" | "notrump" | "nt"
        ) {
            return Ok(Trump::NONE);
        }
        Suit::from_name(trimmed)
            .map(Trump::suit)
            .ok_or_else(|| TrumpError::InvalidTrumpSuit(trimmed.to_string()))
    }
}

impl fmt::Display for Trump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_suit() {
            Some(suit) => f.write_str(suit.name()),
            None => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrumpError {
    #[error("trump must be one of club, diamond, heart, spade or none, not '{0}'")]
    InvalidTrumpSuit(String),
}
