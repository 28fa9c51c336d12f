use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use crate::model::trump::Trump;
use serde::Serialize;
use thiserror::Error;

/// One card from every seat, in play order.
#[derive(Debug, Clone, Serialize)]
pub struct Trick {
    capacity: usize,
    plays: Vec<Play>,
    lead_suit: Option<Suit>,
    winner: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Play {
    pub player: PlayerId,
    pub card: Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already holds a card from every player")]
    TrickComplete,
    #[error("{0} has already played this trick")]
    AlreadyPlayed(PlayerId),
    #[error("trick has {played} of {expected} cards and cannot be resolved")]
    Incomplete { played: usize, expected: usize },
    #[error("trick winner has already been resolved")]
    AlreadyResolved,
}

impl Trick {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            plays: Vec::with_capacity(capacity),
            lead_suit: None,
            winner: None,
        }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.capacity
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.lead_suit
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn add_card(&mut self, player: PlayerId, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }
        if self.plays.iter().any(|play| play.player == player) {
            return Err(TrickError::AlreadyPlayed(player));
        }
        if self.lead_suit.is_none() {
            self.lead_suit = Some(card.suit);
        }
        self.plays.push(Play { player, card });
        Ok(())
    }

    /// Settles the winner of a full trick: highest trump, else highest card of the led suit.
    pub fn resolve(&mut self, trump: Trump) -> Result<PlayerId, TrickError> {
        if self.winner.is_some() {
            return Err(TrickError::AlreadyResolved);
        }
        if !self.is_complete() {
            return Err(TrickError::Incomplete {
                played: self.plays.len(),
                expected: self.capacity,
            });
        }
        let best = winning_play(&self.plays, trump).ok_or(TrickError::Incomplete {
            played: 0,
            expected: self.capacity,
        })?;
        self.winner = Some(best.player);
        Ok(best.player)
    }

    /// The play currently holding the trick, if any card has been played.
    pub fn current_best(&self, trump: Trump) -> Option<Play> {
        winning_play(&self.plays, trump)
    }

    /// Whether `card` would hold the trick if appended now.
    pub fn would_win(&self, card: Card, trump: Trump) -> bool {
        match self.current_best(trump) {
            Some(best) => beats(card, best.card, trump),
            None => true,
        }
    }

    /// Whether `card` beats every card already on the table, one comparison at a time.
    ///
    /// Stricter than [`Trick::would_win`]: a lead-suit card does not beat an
    /// off-suit discard, so any discard makes this false for non-trumps.
    pub fn beats_all(&self, card: Card, trump: Trump) -> bool {
        self.cards().all(|played| beats(card, played, trump))
    }
}

/// Left fold over the plays; order matters because off-suit cards never displace the leader.
fn winning_play(plays: &[Play], trump: Trump) -> Option<Play> {
    let (first, rest) = plays.split_first()?;
    Some(rest.iter().fold(*first, |best, candidate| {
        if beats(candidate.card, best.card, trump) {
            *candidate
        } else {
            best
        }
    }))
}

/// Not a total order: two cards of different non-trump suits never beat each other.
fn beats(challenger: Card, incumbent: Card, trump: Trump) -> bool {
    match (trump.is_trump(challenger), trump.is_trump(incumbent)) {
        (true, false) => true,
        (false, true) => false,
        _ if challenger.suit != incumbent.suit => false,
        _ => challenger.rank > incumbent.rank,
    }
}
