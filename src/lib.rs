//! FDM solver output visualization.
//!
//! Reads the semicolon-delimited CSV files written by the finite-difference
//! pricer and renders convergence charts, European option price comparisons
//! and animated GIFs of solution surfaces evolving over time.

pub mod charts;
pub mod config;
pub mod data;
