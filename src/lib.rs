//! # gama-report: Typed Reports from GAMA Analysis Logs
//!
//! An AutoML search run writes an analysis log mixing free-form messages with
//! machine-readable events. This crate reconstructs a structured report from
//! it:
//!
//! - the optimized metrics ([`metrics`])
//! - duration and algorithm of each execution phase ([`phase`])
//! - every evaluated candidate in log order, with a running best-so-far column
//!   per metric ([`evaluation`])
//! - structured candidates decoded on demand ([`candidate`])
//!
//! ## Pipeline
//!
//! ```text
//! raw lines ──> EventGroup ──┬──> MetricList
//!                            ├──> PhaseRecord × 3
//!                            └──> EvaluationTable ──(lazy)──> CandidateSet
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gama_report::Report;
//!
//! let report = Report::from_path("gama.log")?;
//! for phase in report.phases() {
//!     println!("{}: {} ({:.1}s)", phase.phase(), phase.algorithm(), phase.duration());
//! }
//! let table = report.evaluations();
//! if let Some(best) = table.best(&report.metrics().names()[0]) {
//!     println!("best candidate {}: {}", best.id(), best.pipeline());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod candidate;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod format;
pub mod metrics;
pub mod phase;
pub mod report;
pub mod topk;

pub use error::{CandidateError, Error, Result};
pub use format::LogFormat;
pub use metrics::{MetricList, MetricSource};
pub use report::{Report, ReportBuilder};
