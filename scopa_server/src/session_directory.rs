use std::collections::HashMap;

use log::{error, info};
use scopa_core::{
    error::PlayError,
    events::{MatchId, PlayerView},
    game_state::{ScopaGame, PLAYER_COUNT},
    play::PlayOutcome,
    player::PlayerId,
};
use thiserror::Error;

pub type ParticipantId = String;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a participant id is required")]
    MissingParticipant,
    #[error("match {0} not found")]
    NotFound(MatchId),
    #[error("match {0} is full")]
    Full(MatchId),
    #[error("{participant} is not playing in match {match_id}")]
    NotParticipant {
        match_id: MatchId,
        participant: ParticipantId,
    },
    #[error("match {0} is still waiting for players")]
    NotStarted(MatchId),
    #[error(transparent)]
    Play(#[from] PlayError),
}

pub struct MatchSession {
    game: ScopaGame,
    participants: Vec<ParticipantId>,
    initialized: bool,
    #[cfg(test)]
    pending_fault: Option<PlayError>,
}

impl MatchSession {
    fn new(creator: ParticipantId) -> Self {
        MatchSession {
            game: ScopaGame::new(),
            participants: vec![creator],
            initialized: false,
            #[cfg(test)]
            pending_fault: None,
        }
    }

    fn play_card(
        &mut self,
        player: PlayerId,
        card_index: usize,
        capture_index: usize,
    ) -> Result<PlayOutcome, PlayError> {
        #[cfg(test)]
        if let Some(fault) = self.pending_fault.take() {
            return Err(fault);
        }
        self.game.play_card(player, card_index, capture_index)
    }

    /// Makes the next play on this match fail with `fault`.
    #[cfg(test)]
    pub(crate) fn inject_fault(&mut self, fault: PlayError) {
        self.pending_fault = Some(fault);
    }

    pub fn game(&self) -> &ScopaGame {
        &self.game
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn player_index(&self, participant: &str) -> Option<PlayerId> {
        self.participants.iter().position(|p| p == participant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    pub player_index: PlayerId,
    pub players: usize,
    pub started: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    Waiting { players: usize },
    Active(PlayerView),
}

/// Matches known to this process, keyed by match id. Owned by whoever
/// serializes requests; nothing in here locks.
pub struct SessionDirectory {
    next_match_id: MatchId,
    sessions: HashMap<MatchId, MatchSession>,
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn participant_id(participant: &str) -> Result<ParticipantId, SessionError> {
    let participant = participant.trim();
    if participant.is_empty() {
        return Err(SessionError::MissingParticipant);
    }
    Ok(participant.to_string())
}

impl SessionDirectory {
    pub fn new() -> Self {
        SessionDirectory {
            next_match_id: 1,
            sessions: HashMap::new(),
        }
    }

    pub fn create(&mut self, participant: &str) -> Result<MatchId, SessionError> {
        let creator = participant_id(participant)?;
        let match_id = self.next_match_id;
        self.next_match_id += 1;
        info!("match {} created by '{}'", match_id, creator);
        self.sessions.insert(match_id, MatchSession::new(creator));
        Ok(match_id)
    }

    /// Adds `participant` to the match and deals once the second player arrives.
    /// Joining a match one already belongs to changes nothing.
    pub fn join(
        &mut self,
        match_id: MatchId,
        participant: &str,
    ) -> Result<JoinOutcome, SessionError> {
        let participant = participant_id(participant)?;
        let session = self
            .sessions
            .get_mut(&match_id)
            .ok_or(SessionError::NotFound(match_id))?;
        if session.participants.len() >= PLAYER_COUNT {
            return Err(SessionError::Full(match_id));
        }
        if session.player_index(&participant).is_none() {
            info!("'{}' joined match {}", participant, match_id);
            session.participants.push(participant.clone());
        }
        if session.participants.len() == PLAYER_COUNT && !session.initialized {
            session.game.setup_match();
            session.initialized = true;
            info!("match {} started", match_id);
        }
        Ok(JoinOutcome {
            player_index: session
                .player_index(&participant)
                .ok_or(SessionError::NotParticipant {
                    match_id,
                    participant: participant.clone(),
                })?,
            players: session.participants.len(),
            started: session.initialized,
        })
    }

    pub fn get(&self, match_id: MatchId) -> Option<&MatchSession> {
        self.sessions.get(&match_id)
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, match_id: MatchId) -> Option<&mut MatchSession> {
        self.sessions.get_mut(&match_id)
    }

    pub fn state(&self, match_id: MatchId, participant: &str) -> Result<MatchState, SessionError> {
        let session = self.get(match_id).ok_or(SessionError::NotFound(match_id))?;
        if !session.initialized {
            return Ok(MatchState::Waiting {
                players: session.participants.len(),
            });
        }
        let player = session
            .player_index(participant)
            .ok_or_else(|| SessionError::NotParticipant {
                match_id,
                participant: participant.to_string(),
            })?;
        Ok(MatchState::Active(PlayerView::new(&session.game, player)))
    }

    /// Runs one play through the match engine. A match whose engine reports
    /// an unrecoverable fault is dropped from the directory.
    pub fn play(
        &mut self,
        match_id: MatchId,
        participant: &str,
        card_index: usize,
        capture_index: usize,
    ) -> Result<PlayOutcome, SessionError> {
        let session = self
            .sessions
            .get_mut(&match_id)
            .ok_or(SessionError::NotFound(match_id))?;
        let player = session
            .player_index(participant)
            .ok_or_else(|| SessionError::NotParticipant {
                match_id,
                participant: participant.to_string(),
            })?;
        if !session.initialized {
            return Err(SessionError::NotStarted(match_id));
        }
        let result = session.play_card(player, card_index, capture_index);
        if let Err(e) = &result {
            if !e.is_recoverable() {
                error!("dropping match {}: {}", match_id, e);
                self.sessions.remove(&match_id);
            }
        }
        Ok(result?)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn next_match_id(&self) -> MatchId {
        self.next_match_id
    }
}
