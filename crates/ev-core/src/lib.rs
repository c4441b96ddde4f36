//! Core domain types for the EV registration dashboard.
//!
//! Holds the record types shared by every pipeline stage, the error taxonomy,
//! the static state-centroid table, CLI settings and display formatting.

pub mod error;
pub mod formatting;
pub mod geo;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
