//! Unidirectional data flow primitives.
//!
//! # Architecture
//!
//! ```text
//! dispatch ──→ bus ──→ Reducer ──→ State ──→ subscribers
//!               ↑         │
//!               │         └──→ Event ──→ Epics ──┐
//!               └────────────────────────────────┘
//! ```
//!
//! - **Event**: anything that flows through the bus
//! - **Reducer**: pure function that transforms state based on events
//! - **Epic**: async pipeline that reacts to events by emitting more events
//! - **Knot**: the loop that ties them together

mod coordinator;
mod epic;
mod error;
mod event;
mod operators;
mod reducer;
mod relay;
mod state;

pub use coordinator::Knot;
pub use epic::{compose, Epic, EventStream, RootEpic};
pub use error::{DispatchError, KnotError};
pub use event::Event;
pub use operators::{concurrent, latest_wins, receiver_stream};
pub use reducer::Reducer;
pub use relay::{EventBus, StateReader, StateRelay, Subscription};
pub use state::KnotState;
