use log::{info, warn};

use crate::{
    events::{GameEvent, PlayerView},
    game_state::{ScopaGame, PLAYER_COUNT},
    play::Action,
    player::Player,
    score::Score,
};

/// Runs a match between two local players, asking each in turn for a play.
pub struct GameLobby {
    players: Vec<Box<dyn Player>>,
}

impl Default for GameLobby {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLobby {
    pub fn new() -> Self {
        GameLobby { players: vec![] }
    }

    pub fn add_player<C, T>(&mut self, player_constructor: C)
    where
        C: FnOnce() -> T,
        T: Player + 'static,
    {
        let player = player_constructor();
        self.players.push(Box::new(player));
    }

    pub fn player_names(&self) -> Vec<&String> {
        self.players.iter().map(|p| p.name()).collect::<Vec<_>>()
    }

    /// Plays `game` to the end. Returns `None` when a player quits or the
    /// table is not full.
    pub fn play_match(&mut self, mut game: ScopaGame) -> Option<Score> {
        if self.players.len() != PLAYER_COUNT {
            warn!("a match needs {} players, got {}", PLAYER_COUNT, self.players.len());
            return None;
        }
        game.setup_match();
        for (i, p) in self.players.iter().enumerate() {
            p.notify(&GameEvent::Connected(PlayerView::new(&game, i)));
        }

        while !game.is_finished() {
            let players_turn = game.turn();
            let view = PlayerView::new(&game, players_turn);
            let play = match self.players[players_turn].obtain_action(&view) {
                Action::Quit => {
                    info!("{} left the match", self.players[players_turn].name());
                    return None;
                }
                Action::Play(play) => play,
            };

            match game.play_card(players_turn, play.card_index, play.capture_index) {
                Ok(outcome) => {
                    let last_play = Some(outcome.public());
                    for (i, p) in self.players.iter().enumerate() {
                        p.notify(&GameEvent::StateUpdate {
                            last_play: last_play.clone(),
                            view: PlayerView::new(&game, i),
                        });
                    }
                }
                Err(e) if e.is_recoverable() => {
                    self.players[players_turn].notify(&GameEvent::Rejected(e));
                }
                Err(e) => {
                    warn!("abandoning match: {}", e);
                    for p in self.players.iter() {
                        p.notify(&GameEvent::Failed {
                            reason: e.to_string(),
                        });
                    }
                    return None;
                }
            }
        }

        let score = game.compute_score();
        info!("match over, points {:?}", score.points());
        Some(score)
    }
}
