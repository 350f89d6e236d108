//! Application-facing store.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::api::Api;
use crate::config::KnotConfig;
use crate::knot::{receiver_stream, DispatchError, Knot, KnotError, Subscription};

use super::epics::root_epic;
use super::events::{AppEvent, DispatchableEvent};
use super::reducer::AppReducer;
use super::state::State;

/// Main logic surface seen by the UI.
pub trait Store: Send + Sync {
    /// Events which happen in the system: dispatched by clients as well as
    /// generated by the store itself.
    fn events(&self) -> Subscription<AppEvent>;

    /// Current state, then every update. Updated on each event.
    fn state(&self) -> Subscription<State>;

    /// Submit an event. Never blocks and never reduces synchronously; the
    /// effect is observed through [`Store::state`].
    fn dispatch(&self, event: DispatchableEvent) -> Result<(), DispatchError>;
}

/// [`Store`] backed by a [`Knot`] running the application reducer and epics.
pub struct AppStore {
    knot: Knot<AppReducer>,
    dispatcher: mpsc::Sender<DispatchableEvent>,
    capacity: usize,
}

impl AppStore {
    /// Build the store without starting it. Subscribe to `events` first if
    /// you need to observe startup, then call [`AppStore::connect`].
    pub fn new(api: Arc<dyn Api>, config: &KnotConfig) -> Self {
        let capacity = config.bus_capacity.max(1);
        let (dispatcher, dispatched) = mpsc::channel(capacity);
        let dispatched = receiver_stream(dispatched)
            .map(AppEvent::Dispatched)
            .boxed();

        let knot = Knot::create(
            State::initial(),
            dispatched,
            root_epic(api, config.broadcast_capacity),
            config,
        )
        .start_with(AppEvent::Init);

        Self {
            knot,
            dispatcher,
            capacity,
        }
    }

    /// Build and start the store. Must be called from within a tokio runtime.
    pub fn start(api: Arc<dyn Api>, config: &KnotConfig) -> Result<Self, KnotError> {
        let store = Self::new(api, config);
        store.connect()?;
        Ok(store)
    }

    pub fn connect(&self) -> Result<(), KnotError> {
        self.knot.connect()
    }

    pub fn latest_state(&self) -> State {
        self.knot.latest_state()
    }

    pub fn shutdown(&self) {
        self.knot.shutdown();
    }

    /// Resolves when the store stops; reports a reducer failure if that is
    /// why it stopped.
    pub async fn closed(&self) -> Result<(), KnotError> {
        self.knot.join().await
    }
}

impl Store for AppStore {
    fn events(&self) -> Subscription<AppEvent> {
        self.knot.events()
    }

    fn state(&self) -> Subscription<State> {
        self.knot.state()
    }

    fn dispatch(&self, event: DispatchableEvent) -> Result<(), DispatchError> {
        if self.knot.is_closed() {
            return Err(DispatchError::Closed);
        }
        match self.dispatcher.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                tracing::error!(?event, capacity = self.capacity, "dispatch queue full, event rejected");
                Err(DispatchError::Full {
                    capacity: self.capacity,
                })
            }
            Err(TrySendError::Closed(_)) => Err(DispatchError::Closed),
        }
    }
}
