use serde::{Deserialize, Serialize};

use crate::{card::Card, game_state::PLAYER_COUNT, player::PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Play {
    pub card_index: usize,
    pub capture_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Quit,
    Play(Play),
}

/// What an accepted play did, taken right after the play and any redeal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub player: PlayerId,
    pub card: Card,
    pub captured: Option<Vec<Card>>,
    pub scopa: bool,
    pub table: Vec<Card>,
    pub hands: [Vec<Card>; PLAYER_COUNT],
    pub deck_size: usize,
    pub redealt: bool,
    pub finished: bool,
}

/// The part of a [`PlayOutcome`] both players are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlay {
    pub player: PlayerId,
    pub card: Card,
    pub captured: Option<Vec<Card>>,
    pub scopa: bool,
}

impl PlayOutcome {
    pub fn public(&self) -> PublicPlay {
        PublicPlay {
            player: self.player,
            card: self.card,
            captured: self.captured.clone(),
            scopa: self.scopa,
        }
    }
}
