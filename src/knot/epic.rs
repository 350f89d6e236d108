//! Epics: independent side-effect pipelines driven by the event bus.

use futures::stream::{BoxStream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::event::Event;
use super::operators::receiver_stream;
use super::relay::{EventBus, StateReader};
use super::state::KnotState;

/// Lazily produced sequence of values, owned by whoever polls it.
pub type EventStream<T> = BoxStream<'static, T>;

/// A side-effect pipeline.
///
/// An epic observes the full merged event stream, including events emitted
/// by itself and by sibling epics, and returns a stream of follow-up events.
/// It never touches state directly: emitting events is its only effect.
/// Failures of asynchronous work must be mapped to events inside the epic.
///
/// Any `Fn(EventStream<E>, StateReader<S>) -> EventStream<E>` is an epic.
pub trait Epic<S, E>: Send + Sync + 'static {
    fn run(&self, events: EventStream<E>, state: StateReader<S>) -> EventStream<E>;
}

impl<S, E, F> Epic<S, E> for F
where
    F: Fn(EventStream<E>, StateReader<S>) -> EventStream<E> + Send + Sync + 'static,
{
    fn run(&self, events: EventStream<E>, state: StateReader<S>) -> EventStream<E> {
        self(events, state)
    }
}

const DEFAULT_ROOT_CAPACITY: usize = 1024;

/// Composition of several epics into one.
///
/// Every constituent receives the same input stream. Outputs are merged in
/// arrival order. Each constituent runs on its own task, so one that panics or
/// completes leaves the others running.
pub struct RootEpic<S, E> {
    epics: Vec<(&'static str, Box<dyn Epic<S, E>>)>,
    capacity: usize,
}

impl<S: KnotState, E: Event> RootEpic<S, E> {
    pub fn new() -> Self {
        Self {
            epics: Vec::new(),
            capacity: DEFAULT_ROOT_CAPACITY,
        }
    }

    /// Buffer size for the internal fan-out and fan-in channels.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with(mut self, name: &'static str, epic: impl Epic<S, E>) -> Self {
        self.epics.push((name, Box::new(epic)));
        self
    }

    pub fn len(&self) -> usize {
        self.epics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epics.is_empty()
    }
}

impl<S: KnotState, E: Event> Default for RootEpic<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KnotState, E: Event> Epic<S, E> for RootEpic<S, E> {
    fn run(&self, events: EventStream<E>, state: StateReader<S>) -> EventStream<E> {
        // Subscriptions are taken before the forwarder starts so no
        // constituent misses the first event.
        let fanout = EventBus::new(self.capacity);
        let (sender, receiver) = mpsc::channel(self.capacity);

        for (name, epic) in &self.epics {
            let name = *name;
            let output = epic.run(fanout.subscribe_stream(name), state.clone());
            let handle = tokio::spawn(forward(output, sender.clone()));
            tokio::spawn(watch_epic(name, handle));
        }
        drop(sender);

        tokio::spawn(async move {
            let mut events = events;
            while let Some(event) = events.next().await {
                fanout.publish(event);
            }
            fanout.close();
        });

        receiver_stream(receiver)
    }
}

/// Compose epics under their names. See [`RootEpic`].
pub fn compose<S: KnotState, E: Event>(
    epics: Vec<(&'static str, Box<dyn Epic<S, E>>)>,
) -> RootEpic<S, E> {
    RootEpic {
        epics,
        capacity: DEFAULT_ROOT_CAPACITY,
    }
}

async fn forward<E>(mut output: EventStream<E>, sender: mpsc::Sender<E>) {
    while let Some(event) = output.next().await {
        if sender.send(event).await.is_err() {
            break;
        }
    }
}

async fn watch_epic(name: &'static str, handle: JoinHandle<()>) {
    match handle.await {
        Ok(()) => tracing::debug!(epic = name, "epic completed"),
        Err(err) if err.is_panic() => {
            tracing::error!(epic = name, "epic panicked; sibling epics keep running")
        }
        Err(_) => tracing::debug!(epic = name, "epic cancelled"),
    }
}

