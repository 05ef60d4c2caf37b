use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    card::Card,
    error::PlayError,
    game_state::ScopaGame,
    play::PublicPlay,
    player::PlayerId,
    score::Score,
};

pub type MatchId = u64;

/// What one player may see of a match: the opponent's hand is reduced to its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_index: PlayerId,
    pub your_turn: bool,
    pub turn: PlayerId,
    pub hand: Vec<Card>,
    pub opponent_hand_size: usize,
    pub table: Vec<Card>,
    pub player_taken: Vec<Card>,
    pub opponent_taken: Vec<Card>,
    pub scopa: u32,
    pub opponent_scopa: u32,
    pub deck_size: usize,
    pub finished: bool,
    pub score: Score,
}

impl PlayerView {
    pub fn new(game: &ScopaGame, player: PlayerId) -> Self {
        let opponent = ScopaGame::opponent(player);
        PlayerView {
            player_index: player,
            your_turn: game.turn() == player,
            turn: game.turn(),
            hand: game.hand(player).to_vec(),
            opponent_hand_size: game.hand(opponent).len(),
            table: game.table().to_vec(),
            player_taken: game.taken(player).to_vec(),
            opponent_taken: game.taken(opponent).to_vec(),
            scopa: game.scopa_count(player),
            opponent_scopa: game.scopa_count(opponent),
            deck_size: game.deck_size(),
            finished: game.is_finished(),
            score: game.compute_score(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub matches: usize,
    pub next_match_id: MatchId,
    pub active_sinks: BTreeMap<MatchId, usize>,
}

/// Messages pushed from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum GameEvent {
    MatchCreated { match_id: MatchId },
    Joined { match_id: MatchId, player_index: PlayerId },
    PlayerJoined { players: usize },
    Waiting { players: usize },
    Connected(PlayerView),
    StateUpdate {
        last_play: Option<PublicPlay>,
        view: PlayerView,
    },
    Rejected(PlayError),
    Failed { reason: String },
    PlayerDisconnected { participant: String },
    Health(HealthReport),
}

/// Requests sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ClientEvent {
    CreateMatch,
    JoinMatch {
        match_id: MatchId,
    },
    State {
        match_id: MatchId,
    },
    Play {
        match_id: MatchId,
        card_index: usize,
        #[serde(default)]
        capture_index: usize,
    },
    Health,
}
