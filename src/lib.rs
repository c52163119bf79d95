//! ctrl-anova - Statistical comparison of control algorithms
//!
//! This library generates synthetic control-error samples for PID, LQR and MPC
//! controllers, runs a one-way ANOVA over them, and renders the outcome as a
//! comparison plot and a Markdown report.

pub mod algorithm;
pub mod anova;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod report;
pub mod visualize;

pub use error::{AnovaError, Result};
