use crate::model::card::Card;
use crate::model::hand::Hand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("cannot deal {hand_size} cards to {players} players from a {available}-card deck")]
    DeckExhausted {
        hand_size: usize,
        players: usize,
        available: usize,
    },
    #[error("deal requires at least one card and one player")]
    EmptyDeal,
}

impl Deck {
    pub fn standard() -> Self {
        Self {
            cards: Card::ALL.to_vec(),
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Checks that `hand_size` cards can go to each of `players` seats.
    pub fn check_deal(&self, hand_size: usize, players: usize) -> Result<(), DealError> {
        if hand_size == 0 || players == 0 {
            return Err(DealError::EmptyDeal);
        }
        match hand_size.checked_mul(players) {
            Some(total) if total <= self.cards.len() => Ok(()),
            _ => Err(DealError::DeckExhausted {
                hand_size,
                players,
                available: self.cards.len(),
            }),
        }
    }

    /// Shuffles the deck and deals its prefix round-robin, one sorted hand per seat.
    ///
    /// Validation happens before the shuffle, so a failed deal leaves the deck untouched.
    pub fn shuffle_and_deal<R: rand::Rng + ?Sized>(
        &mut self,
        hand_size: usize,
        players: usize,
        rng: &mut R,
    ) -> Result<Vec<Hand>, DealError> {
        self.check_deal(hand_size, players)?;
        self.shuffle_in_place(rng);
        Ok(self.deal_prefix(hand_size, players))
    }

    /// Deals the current order without shuffling.
    pub fn deal(&self, hand_size: usize, players: usize) -> Result<Vec<Hand>, DealError> {
        self.check_deal(hand_size, players)?;
        Ok(self.deal_prefix(hand_size, players))
    }

    fn deal_prefix(&self, hand_size: usize, players: usize) -> Vec<Hand> {
        let total = hand_size * players;
        (0..players)
            .map(|seat| {
                let cards = self.cards[..total]
                    .iter()
                    .skip(seat)
                    .step_by(players)
                    .copied()
                    .collect();
                Hand::with_cards(cards)
            })
            .collect()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}
