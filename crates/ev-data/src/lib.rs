//! Data pipeline for the EV registration dashboard.
//!
//! Loads the CSV exports, removes placeholder rows, restricts to a year
//! range, melts wide category tables into observations, aggregates by year
//! or year and category, and joins makers to state centroids. Every stage is
//! a pure function over its inputs; [`views::build_views`] runs them all for
//! one set of filter parameters.

pub mod aggregator;
pub mod cleaner;
pub mod geo_joiner;
pub mod loader;
pub mod range_filter;
pub mod reshaper;
pub mod selection;
pub mod views;

pub use ev_core as core;
