//! Reducer trait for the knot.

use super::event::Event;
use super::state::KnotState;

/// Reducer transforms state based on events.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure, total function: (State, Event) -> State. Events it
/// does not recognise return the state unchanged.
pub trait Reducer: Send + 'static {
    /// The state type this reducer operates on.
    type State: KnotState;

    /// The event type this reducer handles.
    type Event: Event;

    /// Process an event and return the new state.
    ///
    /// A panic here is a defect: the knot stops and reports it instead of
    /// carrying on with a half-applied transition.
    fn reduce(state: Self::State, event: &Self::Event) -> Self::State;
}
