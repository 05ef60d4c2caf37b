use crate::{events::GameEvent, events::PlayerView, play::Action};

pub type PlayerId = usize;

pub struct PlayerData {
    name: String,
}

impl PlayerData {
    pub fn new(name: String) -> Self {
        PlayerData { name }
    }
}

/// Someone sitting at a local match: a person at the terminal or a computer.
pub trait Player {
    fn data(&self) -> &PlayerData;

    fn name(&self) -> &String {
        &self.data().name
    }

    fn notify(&self, event: &GameEvent);

    fn obtain_action(&self, view: &PlayerView) -> Action;
}
