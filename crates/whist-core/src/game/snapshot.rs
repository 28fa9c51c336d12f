//! Read-only views of a seat's situation, handed to downstream collectors.

use crate::game::round::RoundResult;
use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::model::trick::Play;
use crate::model::trump::Trump;
use serde::Serialize;

/// What the acting seat knows at the moment it must play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaySnapshot {
    pub player: PlayerId,
    pub hand: Vec<Card>,
    pub cards_seen: Vec<Card>,
    pub trick: Vec<Play>,
    pub contract: Option<u8>,
    pub trick_count: u8,
    pub trick_fraction: f64,
    pub hand_size: u8,
    pub trump: Trump,
}

impl PlaySnapshot {
    /// Dense card ids, suitable for one-hot encodings.
    pub fn hand_indices(&self) -> Vec<usize> {
        self.hand.iter().map(|card| card.index()).collect()
    }
}

/// Receives a snapshot for every card played, together with the chosen card.
pub trait PlayObserver {
    fn observe(&mut self, snapshot: &PlaySnapshot, chosen: Card);

    /// Called once per round after scoring, so collectors can label what they saw.
    fn round_complete(&mut self, _result: &RoundResult) {}
}

impl PlayObserver for Vec<(PlaySnapshot, Card)> {
    fn observe(&mut self, snapshot: &PlaySnapshot, chosen: Card) {
        self.push((snapshot.clone(), chosen));
    }
}
