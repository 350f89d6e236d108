//! Error types for the knot.

use thiserror::Error;

/// Errors observed by knot owners and subscribers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KnotError {
    /// `connect` was called more than once.
    #[error("knot is already connected")]
    AlreadyConnected,

    /// The knot loop has stopped; no further values will be produced.
    #[error("knot is closed")]
    Closed,

    /// A subscriber fell behind the broadcast buffer and missed values.
    #[error("subscriber lagged behind, {skipped} values skipped")]
    Lagged { skipped: u64 },

    /// The reducer panicked while applying an event.
    #[error("reducer panicked: {message}")]
    ReducerPanicked { message: String },
}

/// Errors returned by `dispatch`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The dispatch queue is at capacity; the event was not accepted.
    #[error("dispatch queue is full ({capacity} events pending)")]
    Full { capacity: usize },

    /// The knot has stopped accepting events.
    #[error("knot is closed")]
    Closed,
}
