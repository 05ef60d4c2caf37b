use log::{info, warn};
use scopa_core::{
    events::{ClientEvent, GameEvent, HealthReport, MatchId},
    play::PublicPlay,
};

use crate::{
    notifier::{Notifier, Sink, SinkId},
    session_directory::{MatchState, SessionDirectory, SessionError},
};

/// Connects client requests to the session directory and pushes the
/// resulting views through the notifier. Requests are handled one at a time.
#[derive(Default)]
pub struct GameLobby {
    directory: SessionDirectory,
    notifier: Notifier,
}

impl GameLobby {
    pub fn new() -> Self {
        GameLobby {
            directory: SessionDirectory::new(),
            notifier: Notifier::new(),
        }
    }

    /// Handles one request and returns the replies meant for the requester only.
    /// `sink` is called when the requester needs to be subscribed to a match.
    pub fn handle<S>(
        &mut self,
        client: SinkId,
        participant: &str,
        event: ClientEvent,
        sink: S,
    ) -> Vec<GameEvent>
    where
        S: FnOnce() -> Box<dyn Sink>,
    {
        match self.dispatch(client, participant, event, sink) {
            Ok(replies) => replies,
            Err(SessionError::Play(e)) if e.is_recoverable() => vec![GameEvent::Rejected(e)],
            Err(e) => {
                warn!("request from '{}' failed: {}", participant, e);
                vec![GameEvent::Failed {
                    reason: e.to_string(),
                }]
            }
        }
    }

    fn dispatch<S>(
        &mut self,
        client: SinkId,
        participant: &str,
        event: ClientEvent,
        sink: S,
    ) -> Result<Vec<GameEvent>, SessionError>
    where
        S: FnOnce() -> Box<dyn Sink>,
    {
        match event {
            ClientEvent::CreateMatch => {
                let match_id = self.directory.create(participant)?;
                self.notifier.register(match_id, client, participant, sink());
                Ok(vec![
                    GameEvent::MatchCreated { match_id },
                    GameEvent::Joined {
                        match_id,
                        player_index: 0,
                    },
                    GameEvent::Waiting { players: 1 },
                ])
            }
            ClientEvent::JoinMatch { match_id } => {
                let outcome = self.directory.join(match_id, participant)?;
                self.notifier.register(match_id, client, participant, sink());
                self.notifier.broadcast(
                    match_id,
                    &GameEvent::PlayerJoined {
                        players: outcome.players,
                    },
                );
                if outcome.started {
                    self.publish(match_id, None);
                }
                let mut replies = vec![GameEvent::Joined {
                    match_id,
                    player_index: outcome.player_index,
                }];
                if !outcome.started {
                    replies.push(GameEvent::Waiting {
                        players: outcome.players,
                    });
                }
                Ok(replies)
            }
            ClientEvent::State { match_id } => {
                let state = self.directory.state(match_id, participant)?;
                // participants asking for the state get pushes again, e.g. after reconnecting
                let seated = self
                    .directory
                    .get(match_id)
                    .and_then(|session| session.player_index(participant))
                    .is_some();
                if seated {
                    self.notifier.register(match_id, client, participant, sink());
                }
                Ok(vec![match state {
                    MatchState::Waiting { players } => GameEvent::Waiting { players },
                    MatchState::Active(view) => GameEvent::Connected(view),
                }])
            }
            ClientEvent::Play {
                match_id,
                card_index,
                capture_index,
            } => match self.directory.play(match_id, participant, card_index, capture_index) {
                Ok(outcome) => {
                    self.publish(match_id, Some(outcome.public()));
                    if outcome.finished {
                        info!("match {} finished", match_id);
                    }
                    Ok(vec![])
                }
                Err(SessionError::Play(e)) if !e.is_recoverable() => {
                    self.notifier.broadcast(
                        match_id,
                        &GameEvent::Failed {
                            reason: e.to_string(),
                        },
                    );
                    self.notifier.drop_match(match_id);
                    Err(SessionError::Play(e))
                }
                Err(e) => Err(e),
            },
            ClientEvent::Health => Ok(vec![GameEvent::Health(self.health())]),
        }
    }

    fn publish(&mut self, match_id: MatchId, last_play: Option<PublicPlay>) {
        match self.directory.get(match_id) {
            Some(session) if session.is_initialized() => {
                self.notifier.publish_views(match_id, session, last_play);
            }
            _ => {}
        }
    }

    /// Forgets a client's subscriptions and tells the remaining players.
    pub fn disconnect(&mut self, client: SinkId) {
        for (match_id, participant) in self.notifier.unregister(client) {
            info!("'{}' left match {}", participant, match_id);
            self.notifier
                .broadcast(match_id, &GameEvent::PlayerDisconnected { participant });
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            matches: self.directory.len(),
            next_match_id: self.directory.next_match_id(),
            active_sinks: self.notifier.active_sinks(),
        }
    }
}
