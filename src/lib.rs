//! Unidirectional state container for a movie browsing app.
//!
//! - [`knot`] - generic event bus / reducer / epic loop
//! - [`logic`] - the movie app's events, state, reducers, epics and store
//! - [`api`] - movie API capability consumed by epics

pub mod api;
pub mod config;
pub mod knot;
pub mod logging;
pub mod logic;
pub mod shutdown;
