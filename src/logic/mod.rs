//! Movie browsing logic: events, state, reducers, epics and the store.
//!
//! # Architecture
//!
//! - `events.rs` - User intent (`DispatchableEvent`) and the full `AppEvent` set
//! - `state.rs` - `State` with its screen backstack
//! - `screens/` - Per-screen state and reducers (discover, movie details)
//! - `reducer.rs` - Root reducer combining the config and screens slices
//! - `epics/` - Side effects (API calls, navigation, finish)
//! - `store.rs` - `Store` facade over the knot

pub mod epics;
pub mod events;
pub mod reducer;
pub mod screens;
pub mod state;
pub mod store;

pub use events::{AppEvent, DispatchableEvent};
pub use reducer::{config_reducer, AppReducer};
pub use screens::{screens_reducer, DiscoverScreenState, MovieDetailsState};
pub use state::{ScreenState, State};
pub use store::{AppStore, Store};
