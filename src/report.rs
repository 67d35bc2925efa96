//! Report - the parsed view of one analysis log
//!
//! Construction tokenizes the log, resolves the metrics, extracts the phase
//! timeline and builds the evaluation table, all before returning. Candidates
//! are decoded on first request only.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::candidate::{CandidateDecoder, CandidateSet, Grammar};
use crate::evaluation::EvaluationTable;
use crate::events::{EventGroup, ParsedEvent};
use crate::format::LogFormat;
use crate::metrics::{resolve_metric_configuration, MetricList, MetricSource};
use crate::phase::{extract_phases, PhaseRecord};
use crate::{Error, Result};

/// Name used for reports built from in-memory lines.
pub const NAMELESS: &str = "nameless";

/// Parsed analysis log.
///
/// # Example
///
/// ```rust
/// use gama_report::Report;
///
/// let log = [
///     "Using GAMA version 20.2.0.",
///     "GamaClassifier(scoring=accuracy,regularize_length=True)",
///     "PLE;PH_START;preprocessing;default;2020-01-01 10:00:00,000000;END!",
///     "PLE;PH_END;preprocessing;default;2020-01-01 10:00:01,000000;END!",
///     "PLE;PH_START;search;AsyncEA;2020-01-01 10:00:01,000000;END!",
///     "PLE;EVAL;2020-01-01 10:00:02,000000;1.5;1.2;(0.9,5);c1;GaussianNB(data);2020-01-01 10:00:03,500000;END!",
///     "PLE;PH_END;search;AsyncEA;2020-01-01 10:00:31,000000;END!",
///     "PLE;PH_START;postprocess;BestFitPostProcessing;2020-01-01 10:00:31,000000;END!",
///     "PLE;PH_END;postprocess;BestFitPostProcessing;2020-01-01 10:00:32,000000;END!",
/// ];
///
/// let report = Report::from_lines(log)?;
/// assert_eq!(report.metrics().names(), ["accuracy", "length"]);
/// assert_eq!(report.evaluations().cummax("accuracy"), Some(&[0.9][..]));
/// assert_eq!(report.phases()[1].algorithm(), "AsyncEA");
/// assert!(report.candidates().get("c1").is_some());
/// # Ok::<(), gama_report::Error>(())
/// ```
pub struct Report {
    name: String,
    metrics: MetricList,
    phases: Vec<PhaseRecord>,
    evaluations: EvaluationTable,
    decoder: Arc<dyn CandidateDecoder>,
    candidates: OnceLock<CandidateSet>,
}

impl Report {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }

    /// Parse the log file at `path` with default settings.
    ///
    /// # Errors
    ///
    /// See [`ReportBuilder::build`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path.as_ref()).build()
    }

    /// Parse in-memory log lines with default settings.
    ///
    /// # Errors
    ///
    /// See [`ReportBuilder::build`].
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().lines(lines).build()
    }

    /// Report name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optimized metrics, in objective order.
    #[must_use]
    pub const fn metrics(&self) -> &MetricList {
        &self.metrics
    }

    /// One record per phase: preprocessing, search, postprocess.
    #[must_use]
    pub fn phases(&self) -> &[PhaseRecord] {
        &self.phases
    }

    /// Evaluation table.
    #[must_use]
    pub const fn evaluations(&self) -> &EvaluationTable {
        &self.evaluations
    }

    /// Decoded candidates of every evaluation, keyed by candidate id.
    ///
    /// Decoding happens once, on the first call; every later call (from any
    /// thread) observes that same set.
    pub fn candidates(&self) -> &CandidateSet {
        self.candidates.get_or_init(|| {
            let set = CandidateSet::decode_all(self.evaluations.pipelines(), self.decoder.as_ref());
            tracing::info!(
                report = %self.name,
                decoded = set.len(),
                failed = set.failure_count(),
                "decoded candidates"
            );
            set
        })
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("name", &self.name)
            .field("metrics", &self.metrics)
            .field("phases", &self.phases)
            .field("evaluations", &self.evaluations.len())
            .field("candidates_decoded", &self.candidates.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Report`].
///
/// Exactly one of [`path`](Self::path) and [`lines`](Self::lines) must be set.
#[derive(Default)]
pub struct ReportBuilder {
    path: Option<PathBuf>,
    lines: Option<Vec<String>>,
    name: Option<String>,
    format: LogFormat,
    metrics: MetricSource,
    decoder: Option<Arc<dyn CandidateDecoder>>,
}

impl ReportBuilder {
    /// Read the log from a file.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Use in-memory log lines.
    #[must_use]
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Report name (defaults to the path, or [`NAMELESS`]).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Log framing and timestamp conventions.
    #[must_use]
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Where metric names come from.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricSource) -> Self {
        self.metrics = metrics;
        self
    }

    /// Candidate decoder (defaults to [`Grammar::shared`]).
    #[must_use]
    pub fn decoder(mut self, decoder: Arc<dyn CandidateDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Parse the log.
    ///
    /// # Errors
    ///
    /// - [`Error::Argument`] if neither or both of path and lines were given
    /// - [`Error::Io`] if the log file cannot be read
    /// - [`Error::Config`] if the log format is invalid
    /// - [`Error::Format`] if the configuration line is malformed
    /// - [`Error::PhaseNotFound`] if a phase start or end event is missing
    /// - [`Error::Parse`] if an event cannot be converted
    pub fn build(self) -> Result<Report> {
        let (lines, default_name) = match (self.path, self.lines) {
            (None, None) => {
                return Err(Error::Argument(
                    "either a log path or log lines must be provided".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(Error::Argument(
                    "only one of a log path and log lines may be provided".to_string(),
                ))
            }
            (Some(path), None) => {
                let lines = read_lines(&path)?;
                (lines, path.display().to_string())
            }
            (None, Some(lines)) => (lines, NAMELESS.to_string()),
        };
        let name = self.name.unwrap_or(default_name);
        self.format.validate()?;

        let metrics = match self.metrics {
            MetricSource::ConfigurationLine => Some(resolve_metric_configuration(&lines)?),
            MetricSource::Inferred => None,
            MetricSource::Explicit(metrics) => Some(metrics),
        };

        let events = EventGroup::from_lines(&lines, &self.format);
        let other = events
            .parsed(&self.format.tokens)?
            .iter()
            .filter(|event| matches!(event, ParsedEvent::Other { .. }))
            .count();
        tracing::debug!(other, "events outside the report vocabulary");

        let evaluations = EvaluationTable::build(
            events.events(&self.format.tokens.evaluation_result),
            metrics,
            &self.format,
        )?;
        let phases = extract_phases(&events, &self.format)?;

        tracing::info!(
            report = %name,
            lines = lines.len(),
            evaluations = evaluations.len(),
            metrics = ?evaluations.metrics().names(),
            "report ready"
        );

        let decoder: Arc<dyn CandidateDecoder> = match self.decoder {
            Some(decoder) => decoder,
            None => Grammar::shared(),
        };

        Ok(Report {
            name,
            metrics: evaluations.metrics().clone(),
            phases,
            evaluations,
            decoder,
            candidates: OnceLock::new(),
        })
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(|l| l.trim_end().to_string()).collect())
}
