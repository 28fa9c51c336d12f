use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    /// Enumeration order; hands are grouped in this order.
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Club),
            1 => Some(Suit::Diamond),
            2 => Some(Suit::Heart),
            3 => Some(Suit::Spade),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Club => "club",
            Suit::Diamond => "diamond",
            Suit::Heart => "heart",
            Suit::Spade => "spade",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "club" | "clubs" | "c" => Some(Suit::Club),
            "diamond" | "diamonds" | "d" => Some(Suit::Diamond),
            "heart" | "hearts" | "h" => Some(Suit::Heart),
            "spade" | "spades" | "s" => Some(Suit::Spade),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Club => "C",
            Suit::Diamond => "D",
            Suit::Heart => "H",
            Suit::Spade => "S",
        };
        f.write_str(symbol)
    }
}
