use renet::ClientId;
use scopa_core::events::GameEvent;
use tokio::sync::mpsc::{error::TrySendError, Sender};

use crate::notifier::{DeliveryError, Sink};

/// An event waiting to be written to a client's reliable channel.
#[derive(Debug)]
pub struct Outbound {
    pub client_id: ClientId,
    pub event: GameEvent,
}

/// Queues events for one connected client; the server loop drains the queue.
pub struct RemoteSink {
    pub client_id: ClientId,
    pub sender: Sender<Outbound>,
}

impl RemoteSink {
    pub fn new(client_id: ClientId, sender: Sender<Outbound>) -> Self {
        RemoteSink { client_id, sender }
    }
}

impl Sink for RemoteSink {
    fn deliver(&self, event: &GameEvent) -> Result<(), DeliveryError> {
        self.sender
            .try_send(Outbound {
                client_id: self.client_id,
                event: event.clone(),
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::Full,
                TrySendError::Closed(_) => DeliveryError::Closed,
            })
    }
}

#[cfg(test)]
mod tests {
    use renet::ClientId;
    use scopa_core::events::GameEvent;
    use tokio::sync::mpsc::channel;

    use crate::{
        notifier::{DeliveryError, Sink},
        remote_sink::RemoteSink,
    };

    #[test]
    fn deliver_should_queue_until_the_channel_is_full() {
        let (tx, mut rx) = channel(1);
        let sink = RemoteSink::new(ClientId::from_raw(5), tx);

        assert_eq!(sink.deliver(&GameEvent::Waiting { players: 1 }), Ok(()));
        assert_eq!(
            sink.deliver(&GameEvent::Waiting { players: 1 }),
            Err(DeliveryError::Full)
        );

        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.client_id, ClientId::from_raw(5));
        assert_eq!(queued.event, GameEvent::Waiting { players: 1 });
    }

    #[test]
    fn deliver_should_fail_once_the_loop_is_gone() {
        let (tx, rx) = channel(1);
        drop(rx);
        let sink = RemoteSink::new(ClientId::from_raw(5), tx);
        assert_eq!(
            sink.deliver(&GameEvent::Waiting { players: 1 }),
            Err(DeliveryError::Closed)
        );
    }
}
