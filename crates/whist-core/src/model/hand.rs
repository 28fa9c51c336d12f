use crate::model::card::Card;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use thiserror::Error;

/// A player's private cards for one round, kept grouped by suit and rank-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    dealt: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            dealt: 0,
        }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let dealt = cards.len();
        let mut hand = Self { cards, dealt };
        hand.sort();
        hand
    }

    /// Removes and returns `card`.
    pub fn play(&mut self, card: Card) -> Result<Card, HandError> {
        let index = self
            .cards
            .iter()
            .position(|&c| c == card)
            .ok_or(HandError::CardNotInHand(card))?;
        Ok(self.cards.remove(index))
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|card| card.suit == suit)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn dealt(&self) -> usize {
        self.dealt
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards that may be played into `trick`, in hand order.
    pub fn legal_plays(&self, trick: &Trick) -> Vec<Card> {
        self.legal_plays_for(trick.lead_suit())
    }

    /// Must follow the led suit when holding it; otherwise anything goes.
    pub fn legal_plays_for(&self, lead_suit: Option<Suit>) -> Vec<Card> {
        match lead_suit {
            Some(suit) if self.has_suit(suit) => self
                .cards
                .iter()
                .copied()
                .filter(|card| card.suit == suit)
                .collect(),
            _ => self.cards.clone(),
        }
    }

    /// Share of the dealt cards already played, in `0.0..=1.0`.
    pub fn trick_fraction(&self) -> f64 {
        if self.dealt == 0 {
            return 0.0;
        }
        (self.dealt - self.cards.len()) as f64 / self.dealt as f64
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}

#[cfg(test)]
mod tests {
    use super::{Hand, HandError};
    use crate::model::card::Card;
    use crate::model::player::PlayerId;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn cards_are_grouped_by_suit_then_rank() {
        let hand = Hand::with_cards(vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ace, Suit::Club),
            card(Rank::Three, Suit::Heart),
            card(Rank::Two, Suit::Club),
            card(Rank::Nine, Suit::Diamond),
        ]);
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(
            ordered,
            vec![
                card(Rank::Two, Suit::Club),
                card(Rank::Ace, Suit::Club),
                card(Rank::Nine, Suit::Diamond),
                card(Rank::Three, Suit::Heart),
                card(Rank::King, Suit::Spade),
            ]
        );
    }

    #[test]
    fn play_removes_card_once() {
        let target = card(Rank::Three, Suit::Club);
        let mut hand = Hand::with_cards(vec![target, card(Rank::Four, Suit::Heart)]);
        assert_eq!(hand.play(target), Ok(target));
        assert!(!hand.contains(target));
        assert_eq!(hand.play(target), Err(HandError::CardNotInHand(target)));
    }

    #[test]
    fn leading_hand_may_play_anything() {
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Club),
            card(Rank::Ace, Suit::Spade),
        ]);
        let trick = Trick::new(4);
        assert_eq!(hand.legal_plays(&trick).len(), 2);
    }

    #[test]
    fn must_follow_lead_suit_when_able() {
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Club),
            card(Rank::King, Suit::Club),
            card(Rank::Ace, Suit::Spade),
        ]);
        let mut trick = Trick::new(4);
        trick
            .add_card(PlayerId::new(0), card(Rank::Five, Suit::Club))
            .unwrap();

        let legal = hand.legal_plays(&trick);
        assert_eq!(legal.len(), 2);
        assert!(legal.iter().all(|c| c.suit == Suit::Club));
    }

    #[test]
    fn void_in_lead_suit_frees_every_card() {
        let hand = Hand::with_cards(vec![
            card(Rank::Two, Suit::Heart),
            card(Rank::Ace, Suit::Spade),
        ]);
        let legal = hand.legal_plays_for(Some(Suit::Diamond));
        assert_eq!(legal, hand.cards().to_vec());
    }

    #[test]
    fn trick_fraction_tracks_progress() {
        let first = card(Rank::Two, Suit::Club);
        let mut hand = Hand::with_cards(vec![
            first,
            card(Rank::Three, Suit::Club),
            card(Rank::Four, Suit::Club),
            card(Rank::Five, Suit::Club),
        ]);
        assert_eq!(hand.trick_fraction(), 0.0);
        hand.play(first).unwrap();
        assert_eq!(hand.trick_fraction(), 0.25);
        assert_eq!(Hand::new().trick_fraction(), 0.0);
    }
}
