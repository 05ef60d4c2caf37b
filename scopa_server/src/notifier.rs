use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use scopa_core::{
    events::{GameEvent, MatchId, PlayerView},
    play::PublicPlay,
};
use thiserror::Error;

use crate::session_directory::{MatchSession, ParticipantId};

pub type SinkId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("sink is closed")]
    Closed,
    #[error("sink is full")]
    Full,
}

/// Somewhere match events can be pushed to, usually one connected client.
pub trait Sink {
    fn deliver(&self, event: &GameEvent) -> Result<(), DeliveryError>;
}

struct Registration {
    sink_id: SinkId,
    participant: ParticipantId,
    sink: Box<dyn Sink>,
}

/// Sinks registered per match. A sink that fails a delivery is dropped;
/// the failure never reaches whoever triggered the delivery.
#[derive(Default)]
pub struct Notifier {
    sinks: HashMap<MatchId, Vec<Registration>>,
}

impl Notifier {
    pub fn new() -> Self {
        Notifier {
            sinks: HashMap::new(),
        }
    }

    /// Registers `sink` for `match_id`, replacing an earlier sink with the same id.
    pub fn register(
        &mut self,
        match_id: MatchId,
        sink_id: SinkId,
        participant: &str,
        sink: Box<dyn Sink>,
    ) {
        let registrations = self.sinks.entry(match_id).or_default();
        registrations.retain(|r| r.sink_id != sink_id);
        registrations.push(Registration {
            sink_id,
            participant: participant.to_string(),
            sink,
        });
    }

    /// Removes `sink_id` from every match and returns where it was registered.
    pub fn unregister(&mut self, sink_id: SinkId) -> Vec<(MatchId, ParticipantId)> {
        let mut removed = vec![];
        for (&match_id, registrations) in self.sinks.iter_mut() {
            registrations.retain(|r| {
                if r.sink_id == sink_id {
                    removed.push((match_id, r.participant.clone()));
                    false
                } else {
                    true
                }
            });
        }
        self.sinks.retain(|_, registrations| !registrations.is_empty());
        removed
    }

    pub fn drop_match(&mut self, match_id: MatchId) {
        self.sinks.remove(&match_id);
    }

    /// Sends the same event to every sink of the match.
    pub fn broadcast(&mut self, match_id: MatchId, event: &GameEvent) -> usize {
        self.deliver_each(match_id, |_| Some(event.clone()))
    }

    /// Sends each participant of the match their own view of its current state.
    pub fn publish_views(
        &mut self,
        match_id: MatchId,
        session: &MatchSession,
        last_play: Option<PublicPlay>,
    ) -> usize {
        self.deliver_each(match_id, |participant| {
            session
                .player_index(participant)
                .map(|player| GameEvent::StateUpdate {
                    last_play: last_play.clone(),
                    view: PlayerView::new(session.game(), player),
                })
        })
    }

    fn deliver_each<F>(&mut self, match_id: MatchId, event_for: F) -> usize
    where
        F: Fn(&str) -> Option<GameEvent>,
    {
        let Some(registrations) = self.sinks.get_mut(&match_id) else {
            return 0;
        };
        let mut delivered = 0;
        registrations.retain(|r| {
            let Some(event) = event_for(&r.participant) else {
                return true;
            };
            match r.sink.deliver(&event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(e) => {
                    warn!("dropping sink {} of match {}: {}", r.sink_id, match_id, e);
                    false
                }
            }
        });
        if registrations.is_empty() {
            self.sinks.remove(&match_id);
        }
        debug!("delivered {} events for match {}", delivered, match_id);
        delivered
    }

    pub fn active_sinks(&self) -> BTreeMap<MatchId, usize> {
        self.sinks
            .iter()
            .map(|(&match_id, registrations)| (match_id, registrations.len()))
            .collect()
    }
}

#[cfg(test)]
pub mod tests {
    use std::{cell::RefCell, rc::Rc};

    use scopa_core::events::GameEvent;

    use crate::{
        notifier::{DeliveryError, Notifier, Sink},
        session_directory::SessionDirectory,
    };

    #[test]
    fn broadcast_should_reach_every_sink_of_the_match() {
        let mut notifier = Notifier::new();
        let (a, a_log) = TestSink::new();
        let (b, b_log) = TestSink::new();
        let (other, other_log) = TestSink::new();
        notifier.register(1, 10, "alice", Box::new(a));
        notifier.register(1, 11, "bob", Box::new(b));
        notifier.register(2, 12, "carol", Box::new(other));

        let delivered = notifier.broadcast(1, &GameEvent::PlayerJoined { players: 2 });

        assert_eq!(delivered, 2);
        assert_eq!(a_log.borrow().len(), 1);
        assert_eq!(b_log.borrow().len(), 1);
        assert!(other_log.borrow().is_empty());
    }

    #[test]
    fn failing_sink_should_be_removed_without_stopping_delivery() {
        let mut notifier = Notifier::new();
        let (good, good_log) = TestSink::new();
        notifier.register(1, 10, "alice", Box::new(TestSink::failing()));
        notifier.register(1, 11, "bob", Box::new(good));

        assert_eq!(notifier.broadcast(1, &GameEvent::Waiting { players: 1 }), 1);

        assert_eq!(good_log.borrow().len(), 1);
        assert_eq!(notifier.active_sinks().get(&1), Some(&1));
    }

    #[test]
    fn publish_views_should_give_each_participant_their_own_hand() {
        let mut directory = SessionDirectory::new();
        let id = directory.create("alice").unwrap();
        directory.join(id, "bob").unwrap();
        let mut notifier = Notifier::new();
        let (a, a_log) = TestSink::new();
        let (b, b_log) = TestSink::new();
        notifier.register(id, 10, "alice", Box::new(a));
        notifier.register(id, 11, "bob", Box::new(b));

        let session = directory.get(id).unwrap();
        assert_eq!(notifier.publish_views(id, session, None), 2);

        for (log, player) in [(a_log, 0), (b_log, 1)] {
            match &log.borrow()[0] {
                GameEvent::StateUpdate { view, last_play } => {
                    assert_eq!(view.player_index, player);
                    assert_eq!(view.hand, session.game().hand(player).to_vec());
                    assert!(last_play.is_none());
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn unregister_should_report_and_forget_the_sink() {
        let mut notifier = Notifier::new();
        let (a, _) = TestSink::new();
        let (b, _) = TestSink::new();
        notifier.register(1, 10, "alice", Box::new(a));
        notifier.register(1, 10, "alice", Box::new(b));
        assert_eq!(notifier.active_sinks().get(&1), Some(&1));

        assert_eq!(notifier.unregister(10), vec![(1, "alice".to_string())]);
        assert!(notifier.active_sinks().is_empty());
    }

    // Infra ----------------------------------------------------------------

    pub struct TestSink {
        log: Rc<RefCell<Vec<GameEvent>>>,
        fail: bool,
    }

    impl TestSink {
        pub fn new() -> (Self, Rc<RefCell<Vec<GameEvent>>>) {
            let log = Rc::new(RefCell::new(vec![]));
            (
                TestSink {
                    log: log.clone(),
                    fail: false,
                },
                log,
            )
        }

        pub fn failing() -> Self {
            TestSink {
                log: Rc::new(RefCell::new(vec![])),
                fail: true,
            }
        }
    }

    impl Sink for TestSink {
        fn deliver(&self, event: &GameEvent) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Closed);
            }
            self.log.borrow_mut().push(event.clone());
            Ok(())
        }
    }
}
