use game_lobby::GameLobby;
use game_state::ScopaGame;
use player::Player;
use score::Score;

pub mod card;
pub mod error;
pub mod events;
pub mod game_lobby;
mod game_logic;
pub mod game_state;
pub mod play;
pub mod player;
pub mod random_playing_computer;
pub mod score;
pub mod user_name;
pub mod utils;

/// Plays one local match of the given player against a random-playing computer.
pub fn run_game<C, T>(player_constructor: C) -> Option<Score>
where
    C: FnOnce() -> T,
    T: Player + 'static,
{
    run_match(player_constructor, random_playing_computer::RandomPlayingComputer::new)
}

/// Plays one local match between two players, `first` moving first.
pub fn run_match<C1, T1, C2, T2>(first: C1, second: C2) -> Option<Score>
where
    C1: FnOnce() -> T1,
    T1: Player + 'static,
    C2: FnOnce() -> T2,
    T2: Player + 'static,
{
    let mut lobby = GameLobby::new();
    lobby.add_player(first);
    lobby.add_player(second);
    lobby.play_match(ScopaGame::new())
}
