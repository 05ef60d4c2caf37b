use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::{card::Card, player::PlayerId};

pub const PLAYER_COUNT: usize = 2;
pub const HAND_SIZE: usize = 3;
pub const INITIAL_TABLE_SIZE: usize = 4;

/// State of a single two-player match.
///
/// Every card of the deck lives in exactly one of `deck`, `table`, `hands` or
/// `taken`. The engine has no internal synchronization; callers hold it
/// exclusively for the duration of each call.
#[derive(Debug, Clone)]
pub struct ScopaGame {
    pub(crate) deck: Vec<Card>,
    pub(crate) table: Vec<Card>,
    pub(crate) hands: [Vec<Card>; PLAYER_COUNT],
    pub(crate) taken: [Vec<Card>; PLAYER_COUNT],
    pub(crate) scopa: [u32; PLAYER_COUNT],
    pub(crate) turn: PlayerId,
    pub(crate) finished: bool,
}

impl Default for ScopaGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopaGame {
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Card::deck();
        deck.shuffle(rng);
        ScopaGame {
            deck,
            table: vec![],
            hands: [vec![], vec![]],
            taken: [vec![], vec![]],
            scopa: [0; PLAYER_COUNT],
            turn: 0,
            finished: false,
        }
    }

    /// Lays the opening table and deals the first hands.
    pub fn setup_match(&mut self) {
        let n = INITIAL_TABLE_SIZE.min(self.deck.len());
        for _ in 0..n {
            if let Some(card) = self.deck.pop() {
                self.table.push(card);
            }
        }
        debug!("table laid: {}", Card::format_cards(&self.table));
        self.deal();
    }

    /// Gives each player up to three cards, player 0 first. Near the end of
    /// the deck player 1 may receive fewer cards than player 0. Only deals
    /// between hands, once both players have played out.
    pub(crate) fn deal(&mut self) {
        if self.deck.is_empty() || self.hands.iter().any(|h| !h.is_empty()) {
            return;
        }
        for hand in self.hands.iter_mut() {
            let n = HAND_SIZE.min(self.deck.len());
            for _ in 0..n {
                if let Some(card) = self.deck.pop() {
                    hand.push(card);
                }
            }
        }
        debug!(
            "dealt hands of {} and {}, {} cards left in deck",
            self.hands[0].len(),
            self.hands[1].len(),
            self.deck.len()
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished || self.exhausted()
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.deck.is_empty() && self.hands.iter().all(|h| h.is_empty())
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    pub fn table(&self) -> &[Card] {
        &self.table
    }

    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    pub fn hands(&self) -> &[Vec<Card>; PLAYER_COUNT] {
        &self.hands
    }

    pub fn taken(&self, player: PlayerId) -> &[Card] {
        &self.taken[player]
    }

    pub fn scopa_count(&self, player: PlayerId) -> u32 {
        self.scopa[player]
    }

    pub fn turn(&self) -> PlayerId {
        self.turn
    }

    pub fn opponent(player: PlayerId) -> PlayerId {
        1 - player
    }

    /// All cards the match knows about, wherever they currently are.
    pub fn all_cards(&self) -> Vec<Card> {
        self.deck
            .iter()
            .chain(self.table.iter())
            .chain(self.hands.iter().flatten())
            .chain(self.taken.iter().flatten())
            .copied()
            .collect()
    }
}
