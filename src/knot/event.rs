//! Base trait for events flowing through the knot.

use std::fmt::Debug;

/// Marker trait for bus events.
///
/// Events are broadcast, not queued: the reducer and every epic observe the
/// same value, so events must be cheap to clone and shareable across tasks.
pub trait Event: Clone + Debug + Send + Sync + 'static {}
