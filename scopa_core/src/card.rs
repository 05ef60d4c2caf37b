use std::fmt;

use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};

pub type Rank = u8;

pub const LOWEST_RANK: Rank = 1;
pub const HIGHEST_RANK: Rank = 10;

#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    #[strum(message = "denari")]
    Coins,
    #[strum(message = "coppe")]
    Cups,
    #[strum(message = "spade")]
    Swords,
    #[strum(message = "bastoni")]
    Clubs,
}

impl Suit {
    /// Name printed on traditional Italian decks.
    pub fn italian_name(&self) -> &'static str {
        self.get_message().unwrap_or("?")
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const SETTEBELLO: Card = Card {
        rank: 7,
        suit: Suit::Coins,
    };

    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    /// The 40 cards of an Italian deck, ordered by suit then rank.
    pub fn deck() -> Vec<Card> {
        iproduct!(Suit::iter(), LOWEST_RANK..=HIGHEST_RANK)
            .map(|(suit, rank)| Card { rank, suit })
            .collect()
    }

    pub fn is_settebello(&self) -> bool {
        *self == Card::SETTEBELLO
    }

    pub fn primiera_value(&self) -> u32 {
        match self.rank {
            7 => 21,
            6 => 18,
            1 => 16,
            5 => 15,
            4 => 14,
            3 => 13,
            2 => 12,
            _ => 10,
        }
    }

    pub fn format_cards(cards: &[Card]) -> String {
        cards.iter().map(|c| c.to_string()).join(", ")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}
