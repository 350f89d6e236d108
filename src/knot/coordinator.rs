//! The knot: one merged event bus threaded through a reducer and an epic.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::config::KnotConfig;
use crate::shutdown::ShutdownHandle;

use super::epic::{Epic, EventStream};
use super::error::KnotError;
use super::reducer::Reducer;
use super::relay::{EventBus, StateReader, StateRelay, Subscription};

type State<R> = <R as Reducer>::State;
type Event<R> = <R as Reducer>::Event;

/// Everything `connect` needs; consumed on first connect.
struct Wiring<R: Reducer> {
    dispatched: EventStream<Event<R>>,
    epic: Box<dyn Epic<State<R>, Event<R>>>,
    startup: Vec<Event<R>>,
    bus_capacity: usize,
}

/// Coordinator wiring dispatch, epics and the reducer into one loop.
///
/// ```text
/// dispatched ──┐
///              ├──→ bus ──→ reduce ──→ state relay ──→ subscribers
/// epic out ────┘               │
///     ↑                        └──→ event bus ──→ epic, subscribers
///     └────────────────────────────────┘
/// ```
///
/// The reducer sees every event before the epic does, and both see the same
/// order. The knot is inert until [`Knot::connect`]: subscribers can be wired
/// first without missing anything.
pub struct Knot<R: Reducer> {
    state: Arc<StateRelay<State<R>>>,
    events: Arc<EventBus<Event<R>>>,
    shutdown: ShutdownHandle,
    finished: Arc<Finished>,
    wiring: Mutex<Option<Wiring<R>>>,
}

/// How the loop ended, published once it has stopped.
#[derive(Default)]
struct Finished {
    connected: AtomicBool,
    done: ShutdownHandle,
    failure: Mutex<Option<KnotError>>,
}

impl<R: Reducer> Knot<R> {
    /// Build a knot from its initial state, the external event source and the
    /// root epic. Nothing runs until `connect`.
    pub fn create(
        initial: State<R>,
        dispatched: EventStream<Event<R>>,
        epic: impl Epic<State<R>, Event<R>>,
        config: &KnotConfig,
    ) -> Self {
        Self {
            state: Arc::new(StateRelay::new(initial, config.broadcast_capacity)),
            events: Arc::new(EventBus::new(config.broadcast_capacity)),
            shutdown: ShutdownHandle::new(),
            finished: Arc::new(Finished::default()),
            wiring: Mutex::new(Some(Wiring {
                dispatched,
                epic: Box::new(epic),
                startup: Vec::new(),
                bus_capacity: config.bus_capacity,
            })),
        }
    }

    /// Queue an event that is reduced before any dispatched or epic event.
    pub fn start_with(mut self, event: Event<R>) -> Self {
        if let Some(wiring) = self.wiring.get_mut().as_mut() {
            wiring.startup.push(event);
        }
        self
    }

    /// Start the loop. Must be called from within a tokio runtime.
    pub fn connect(&self) -> Result<(), KnotError> {
        let wiring = self
            .wiring
            .lock()
            .take()
            .ok_or(KnotError::AlreadyConnected)?;
        let Wiring {
            dispatched,
            epic,
            startup,
            bus_capacity,
        } = wiring;

        let (bus, inbox) = mpsc::channel(bus_capacity.max(1));

        // Subscribe the epic before the loop publishes its first event.
        let effects = epic.run(
            self.events.subscribe_stream("root-epic"),
            StateReader::new(Arc::clone(&self.state)),
        );
        tokio::spawn(pump(effects, bus.clone(), "epic"));
        tokio::spawn(pump(dispatched, bus, "dispatch"));

        self.finished.connected.store(true, Ordering::SeqCst);
        tokio::spawn(run_loop::<R>(
            startup,
            inbox,
            Arc::clone(&self.state),
            Arc::clone(&self.events),
            self.shutdown.clone(),
            Arc::clone(&self.finished),
        ));
        tracing::info!("knot connected");
        Ok(())
    }

    /// Canonical merged event stream, from the moment of subscription.
    pub fn events(&self) -> Subscription<Event<R>> {
        self.events.subscribe()
    }

    /// Replay-latest state stream.
    pub fn state(&self) -> Subscription<State<R>> {
        self.state.subscribe()
    }

    pub fn latest_state(&self) -> State<R> {
        self.state.latest()
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_shutting_down()
    }

    /// Ask the loop to stop after the event it is currently reducing.
    pub fn shutdown(&self) {
        if self.shutdown.signal() {
            tracing::info!("knot shutdown requested");
        }
    }

    /// Wait for the loop to finish and report how it ended.
    ///
    /// Returns `Ok` immediately if the knot was never connected. Cancel-safe
    /// and repeatable: every caller sees the same outcome.
    pub async fn join(&self) -> Result<(), KnotError> {
        if !self.finished.connected.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.finished.done.wait().await;
        match self.finished.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

async fn pump<E: Send + 'static>(
    mut source: EventStream<E>,
    bus: mpsc::Sender<E>,
    source_name: &'static str,
) {
    while let Some(event) = source.next().await {
        if bus.send(event).await.is_err() {
            tracing::debug!(source = source_name, "bus closed, stopping source");
            return;
        }
    }
    tracing::debug!(source = source_name, "event source completed");
}

async fn run_loop<R: Reducer>(
    startup: Vec<Event<R>>,
    mut inbox: mpsc::Receiver<Event<R>>,
    state: Arc<StateRelay<State<R>>>,
    events: Arc<EventBus<Event<R>>>,
    shutdown: ShutdownHandle,
    finished: Arc<Finished>,
) {
    let mut current = state.latest();
    let mut startup = startup.into_iter();

    let outcome = loop {
        let event = match startup.next() {
            Some(event) => event,
            None => tokio::select! {
                _ = shutdown.wait() => break Ok(()),
                received = inbox.recv() => match received {
                    Some(event) => event,
                    None => break Ok(()),
                },
            },
        };
        match commit::<R>(current, event, &state, &events) {
            Ok(next) => current = next,
            Err(err) => break Err(err),
        }
    };

    shutdown.signal();
    inbox.close();
    events.close();
    state.close();
    match outcome {
        Ok(()) => tracing::info!("knot stopped"),
        Err(err) => {
            tracing::error!(error = %err, "knot stopped on reducer failure");
            *finished.failure.lock() = Some(err);
        }
    }
    finished.done.signal();
}

/// Reduce one event, then publish state before the event reaches epics.
fn commit<R: Reducer>(
    current: State<R>,
    event: Event<R>,
    state: &StateRelay<State<R>>,
    events: &EventBus<Event<R>>,
) -> Result<State<R>, KnotError> {
    let next = panic::catch_unwind(AssertUnwindSafe(|| R::reduce(current, &event))).map_err(
        |payload| KnotError::ReducerPanicked {
            message: panic_message(payload.as_ref()),
        },
    )?;
    tracing::debug!(?event, "event reduced");
    state.publish(next.clone());
    events.publish(event);
    Ok(next)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
