//! # registro
//!
//! An academic record keeper: aggregates heterogeneous, possibly-incomplete
//! grade data into weighted averages and renders per-student and per-subject
//! reports as JSON, HTML, or PDF.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Plain and credit-weighted averaging with an explicit "no data" outcome
pub mod aggregate;
/// Institutional code generation
pub mod codes;
/// The record fetch interface and the relation batch-loader
pub mod fetch;
/// End-to-end report orchestration
pub mod pipeline;
/// Read-only domain records consumed by the pipeline
pub mod records;
/// Canonical report documents, the assembler, and the format renderers
pub mod report;
/// In-memory record store backing the CLI and tests
pub mod store;
/// Boundary validation for scores and credit weights
pub mod validate;

pub use aggregate::AggregateResult;
pub use report::{
    ReportDocument,
    factory::{RenderError, ReportArtifact, ReportFormat},
};
