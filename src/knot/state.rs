//! Base trait for state owned by a knot.

use std::fmt::Debug;

/// Marker trait for knot state.
///
/// States should be:
/// - Immutable (the reducer returns a new value for every event)
/// - Self-contained (all data a subscriber needs to render)
/// - Cheap enough to clone once per event (the relay keeps the latest copy)
pub trait KnotState: Clone + Debug + Send + Sync + 'static {}
