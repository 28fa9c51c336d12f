use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the 52 playing cards.
///
/// Equality is by value. There is no `Ord` impl: cards of
/// different suits only compare inside a trick, where the round's trump
/// decides (see [`crate::model::trick::Trick::resolve`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const COUNT: usize = 52;

    /// Every card, indexed by [`Card::index`].
    pub const ALL: [Card; Card::COUNT] = build_table();

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Stable dense identity in `0..52`: suits in enumeration order, ranks ascending.
    pub const fn index(self) -> usize {
        self.suit.index() * 13 + (self.rank.value() as usize - 2)
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Card::COUNT {
            Some(Card::ALL[index])
        } else {
            None
        }
    }
}

const fn build_table() -> [Card; Card::COUNT] {
    let mut cards = [Card::new(Rank::Two, Suit::Club); Card::COUNT];
    let mut index = 0;
    while index < Card::COUNT {
        cards[index] = Card::new(Rank::ORDERED[index % 13], Suit::ALL[index / 13]);
        index += 1;
    }
    cards
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
