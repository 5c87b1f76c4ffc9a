//! # Time Series Store
//!
//! Aligned hourly input series and the pre-run scenario transforms that
//! shape them. One store plus one set of model parameters fully describes
//! a simulation run.

pub mod store;
pub mod transform;

pub use store::{SeriesBuilder, SeriesColumn, SeriesStore};
