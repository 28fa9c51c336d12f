use crate::model::card::Card;
use crate::model::deck::DealError;
use crate::model::trump::Trump;
use serde::{Deserialize, Serialize};

/// Hand sizes for each round of a game, consumed in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundSchedule {
    hand_sizes: Vec<u8>,
}

impl RoundSchedule {
    /// Down from seven in odd steps, then back up in even steps.
    pub const STANDARD: [u8; 7] = [7, 5, 3, 1, 2, 4, 6];

    pub fn new(hand_sizes: Vec<u8>) -> Self {
        Self { hand_sizes }
    }

    pub fn standard() -> Self {
        Self::new(Self::STANDARD.to_vec())
    }

    pub fn uniform(hand_size: u8, rounds: usize) -> Self {
        Self::new(vec![hand_size; rounds])
    }

    pub fn len(&self) -> usize {
        self.hand_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand_sizes.is_empty()
    }

    pub fn hand_size(&self, round_index: usize) -> Option<u8> {
        self.hand_sizes.get(round_index).copied()
    }

    pub fn hand_sizes(&self) -> &[u8] {
        &self.hand_sizes
    }

    pub fn trump(round_index: usize) -> Trump {
        Trump::for_round(round_index)
    }

    /// Every round must be dealable to `players` seats from one deck.
    pub fn check(&self, players: usize) -> Result<(), DealError> {
        for &size in &self.hand_sizes {
            let size = usize::from(size);
            if size == 0 || players == 0 {
                return Err(DealError::EmptyDeal);
            }
            if size * players > Card::COUNT {
                return Err(DealError::DeckExhausted {
                    hand_size: size,
                    players,
                    available: Card::COUNT,
                });
            }
        }
        Ok(())
    }
}

impl Default for RoundSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
