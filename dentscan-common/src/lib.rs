//! # DentScan Common Library
//!
//! Shared code for the DentScan service including:
//! - Tooth-likeness gate and severity estimator (pixel heuristics)
//! - Recommendation table loading
//! - Reference dataset loading
//! - Upload filename rules
//! - Configuration loading
//! - Error types

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod recommendations;
pub mod upload;

pub use analysis::{ClassificationResult, GateReport, Outcome, SeverityCategory};
pub use error::{Error, Result};
pub use recommendations::RecommendationTable;
