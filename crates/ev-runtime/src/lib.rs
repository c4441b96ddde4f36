//! Session layer for the EV dashboard.
//!
//! Owns the loaded dataset between filter interactions and recomputes the
//! views on demand.

pub mod session;

pub use ev_core as core;
pub use ev_data as data;
