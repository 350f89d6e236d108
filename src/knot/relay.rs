//! Fan-out primitives behind the knot's output streams.
//!
//! - [`EventBus`] broadcasts every committed event to subscribers.
//! - [`StateRelay`] broadcasts every committed state and replays the latest
//!   one to new subscribers.
//!
//! Both hand out [`Subscription`]s. A subscriber that falls behind the
//! broadcast buffer gets [`KnotError::Lagged`] instead of silently missing
//! values.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::epic::EventStream;
use super::error::KnotError;

/// Receiving end of an [`EventBus`] or [`StateRelay`].
pub struct Subscription<T> {
    replay: Option<T>,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    fn new(replay: Option<T>, receiver: broadcast::Receiver<T>) -> Self {
        Self { replay, receiver }
    }

    /// Wait for the next value.
    ///
    /// Returns `Closed` once the producer has stopped and every buffered value
    /// has been delivered.
    pub async fn recv(&mut self) -> Result<T, KnotError> {
        if let Some(value) = self.replay.take() {
            return Ok(value);
        }
        match self.receiver.recv().await {
            Ok(value) => Ok(value),
            Err(RecvError::Closed) => Err(KnotError::Closed),
            Err(RecvError::Lagged(skipped)) => Err(KnotError::Lagged { skipped }),
        }
    }

    /// Convert into a stream that ends when the producer closes.
    ///
    /// Lag is surfaced as an `Err` item; the stream keeps going afterwards.
    pub fn into_stream(self) -> EventStream<Result<T, KnotError>> {
        stream::unfold(self, |mut subscription| async move {
            match subscription.recv().await {
                Err(KnotError::Closed) => None,
                item => Some((item, subscription)),
            }
        })
        .boxed()
    }
}

fn closed_receiver<T: Clone>() -> broadcast::Receiver<T> {
    let (sender, receiver) = broadcast::channel(1);
    drop(sender);
    receiver
}

/// Broadcast channel for committed events. No replay.
pub struct EventBus<E> {
    sender: Mutex<Option<broadcast::Sender<E>>>,
}

impl<E: Clone + Send + 'static> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Mutex::new(Some(sender)),
        }
    }

    pub fn subscribe(&self) -> Subscription<E> {
        let receiver = match self.sender.lock().as_ref() {
            Some(sender) => sender.subscribe(),
            None => closed_receiver(),
        };
        Subscription::new(None, receiver)
    }

    /// Subscribe as an epic input: lag is logged and skipped, close ends the
    /// stream.
    ///
    /// An input that lags sees a gap in the sequence the reducer committed;
    /// the order of what it does see is unchanged. Size the bus capacity so
    /// epics keep up.
    pub fn subscribe_stream(&self, label: &'static str) -> EventStream<E> {
        self.subscribe()
            .into_stream()
            .filter_map(move |item| async move {
                match item {
                    Ok(event) => Some(event),
                    Err(err) => {
                        tracing::error!(input = label, error = %err, "event input dropped events");
                        None
                    }
                }
            })
            .boxed()
    }

    pub fn publish(&self, event: E) {
        if let Some(sender) = self.sender.lock().as_ref() {
            // No subscribers is not an error: the bus has no memory.
            let _ = sender.send(event);
        }
    }

    pub fn close(&self) {
        self.sender.lock().take();
    }
}

struct RelayInner<S> {
    latest: S,
    sender: Option<broadcast::Sender<S>>,
}

/// Replay-latest broadcast for states.
///
/// `publish` and `subscribe` take the same lock, so a new subscriber receives
/// the latest state followed by exactly the states published after it, with
/// no gap and no duplicate.
pub struct StateRelay<S> {
    inner: Mutex<RelayInner<S>>,
}

impl<S: Clone + Send + 'static> StateRelay<S> {
    pub fn new(initial: S, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Mutex::new(RelayInner {
                latest: initial,
                sender: Some(sender),
            }),
        }
    }

    pub fn subscribe(&self) -> Subscription<S> {
        let inner = self.inner.lock();
        let receiver = match inner.sender.as_ref() {
            Some(sender) => sender.subscribe(),
            None => closed_receiver(),
        };
        Subscription::new(Some(inner.latest.clone()), receiver)
    }

    pub fn publish(&self, state: S) {
        let mut inner = self.inner.lock();
        inner.latest = state.clone();
        if let Some(sender) = inner.sender.as_ref() {
            let _ = sender.send(state);
        }
    }

    pub fn latest(&self) -> S {
        self.inner.lock().latest.clone()
    }

    pub fn close(&self) {
        self.inner.lock().sender.take();
    }
}

/// Read-only view of the latest committed state, handed to epics.
///
/// When an epic handles event E the snapshot is the state resulting from E
/// or a later one, never an earlier one.
pub struct StateReader<S> {
    relay: Arc<StateRelay<S>>,
}

impl<S> Clone for StateReader<S> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
        }
    }
}

impl<S: Clone + Send + 'static> StateReader<S> {
    pub fn new(relay: Arc<StateRelay<S>>) -> Self {
        Self { relay }
    }

    pub fn get(&self) -> S {
        self.relay.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn state_subscriber_gets_latest_then_updates() {
        let relay = StateRelay::new(0u32, 8);
        relay.publish(1);
        let mut subscription = relay.subscribe();
        relay.publish(2);
        relay.publish(3);

        assert_eq!(subscription.recv().await, Ok(1));
        assert_eq!(subscription.recv().await, Ok(2));
        assert_eq!(subscription.recv().await, Ok(3));
    }

    #[tokio::test]
    async fn closed_relay_replays_latest_then_closes() {
        let relay = StateRelay::new("initial".to_string(), 4);
        relay.close();
        let mut subscription = relay.subscribe();
        assert_eq!(subscription.recv().await, Ok("initial".to_string()));
        assert_eq!(subscription.recv().await, Err(KnotError::Closed));
    }

    #[tokio::test]
    async fn lagging_subscriber_is_told_how_much_it_missed() {
        let bus = EventBus::new(2);
        let mut subscription = bus.subscribe();
        for value in 0..5u32 {
            bus.publish(value);
        }
        assert_eq!(
            subscription.recv().await,
            Err(KnotError::Lagged { skipped: 3 })
        );
        assert_eq!(subscription.recv().await, Ok(3));
    }

    #[tokio::test]
    async fn lagged_event_input_skips_to_oldest_retained() {
        let bus = EventBus::new(2);
        let stream = bus.subscribe_stream("slow");
        for value in 0..5u32 {
            bus.publish(value);
        }
        bus.close();
        let collected: Vec<u32> = stream.collect().await;
        assert_eq!(collected, vec![3, 4]);
    }

    #[tokio::test]
    async fn event_stream_ends_on_close() {
        let bus = EventBus::new(4);
        let stream = bus.subscribe_stream("test");
        bus.publish(7u8);
        bus.close();
        let collected: Vec<u8> = stream.collect().await;
        assert_eq!(collected, vec![7]);
    }
}
