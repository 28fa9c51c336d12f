use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::trick::Trick;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Seat index in the table's fixed seating order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Next seat clockwise at a table of `players`.
    pub const fn next(self, players: usize) -> PlayerId {
        PlayerId(((self.0 as usize + 1) % players) as u8)
    }

    pub fn all(players: usize) -> impl Iterator<Item = PlayerId> {
        (0..players).map(|index| PlayerId(index as u8))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// Everything a seat accumulates during one round.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    hand: Hand,
    contract: Option<u8>,
    trick_count: u8,
    cards_seen: Vec<Card>,
}

impl PlayerState {
    pub fn with_hand(hand: Hand) -> Self {
        Self {
            hand,
            ..Self::default()
        }
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn contract(&self) -> Option<u8> {
        self.contract
    }

    pub fn set_contract(&mut self, bid: u8) {
        self.contract = Some(bid);
    }

    pub fn trick_count(&self) -> u8 {
        self.trick_count
    }

    pub fn cards_seen(&self) -> &[Card] {
        &self.cards_seen
    }

    pub fn contract_met(&self) -> bool {
        self.contract == Some(self.trick_count)
    }

    /// Folds a resolved trick into this seat's running state.
    pub fn absorb_trick(&mut self, me: PlayerId, trick: &Trick) {
        if trick.winner() == Some(me) {
            self.trick_count += 1;
        }
        self.cards_seen.extend(trick.plays().iter().map(|play| play.card));
    }
}
