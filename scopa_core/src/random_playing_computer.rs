use rand::Rng;

use crate::{
    events::{GameEvent, PlayerView},
    game_state::ScopaGame,
    play::{Action, Play},
    player::{Player, PlayerData},
};

pub struct RandomPlayingComputer {
    pub data: PlayerData,
}

impl RandomPlayingComputer {
    pub fn new() -> Self {
        RandomPlayingComputer {
            data: PlayerData::new("Computer".to_string()),
        }
    }
}

impl Default for RandomPlayingComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayingComputer {
    fn data(&self) -> &PlayerData {
        &self.data
    }

    fn notify(&self, _event: &GameEvent) {}

    fn obtain_action(&self, view: &PlayerView) -> Action {
        if view.hand.is_empty() {
            return Action::Quit;
        }
        let mut rng = rand::thread_rng();
        let card_index = rng.gen_range(0..view.hand.len());
        let options = ScopaGame::possible_captures(&view.hand[card_index], &view.table);
        let capture_index = rng.gen_range(0..options.len());
        Action::Play(Play {
            card_index,
            capture_index,
        })
    }
}
