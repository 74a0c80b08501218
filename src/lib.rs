//! Weekly clinic coverage for staff absent on a night rotation.
//!
//! The optimizer lives in [`coverage`]; the other modules source its inputs
//! from CSV, render its output, and serve it over HTTP.

pub mod config;
pub mod coverage;
pub mod display;
pub mod error;
pub mod parser;
pub mod web;

pub use config::{OptimizerConfig, PenaltyWeights};
pub use coverage::{optimize_coverage, optimize_coverage_with_rng, summarize, CoverageRequest, CoverageResult};
pub use error::CoverageError;
