//! Metric configuration
//!
//! The log never declares its metrics as an event. They are recovered from the
//! construction record on the second line of the log, e.g.
//! `GamaClassifier(scoring=accuracy,regularize_length=True,...)`, or inferred
//! from the arity of the logged fitness tuples.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the secondary objective added when length regularization is on.
pub const LENGTH_METRIC: &str = "length";

/// Zero-based line index of the construction record.
const CONFIGURATION_LINE: usize = 1;

/// Ordered, non-empty list of metric names, in objective order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricList(Vec<String>);

impl MetricList {
    /// Create a metric list from explicit names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `names` is empty or contains duplicates.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Error::Argument("metric list must not be empty".to_string()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::Argument(format!("duplicate metric name '{name}'")));
            }
        }
        Ok(Self(names))
    }

    /// Synthesize `metric_0..metric_{arity-1}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `arity` is zero.
    pub fn inferred(arity: usize) -> Result<Self> {
        if arity == 0 {
            return Err(Error::Parse(
                "cannot infer metric names from an empty fitness tuple".to_string(),
            ));
        }
        Ok(Self((0..arity).map(|i| format!("metric_{i}")).collect()))
    }

    /// Metric names in objective order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Number of metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column position of `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|m| m == name)
    }

    /// Iterate over metric names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// How a report obtains its metric names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetricSource {
    /// Read the construction record (second line of the log).
    #[default]
    ConfigurationLine,
    /// Derive `metric_0..` from the arity of the first fitness tuple.
    Inferred,
    /// Use the given names.
    Explicit(MetricList),
}

/// Extract the metric list from the construction record of `lines`.
///
/// The second line must look like
/// `<Name>(scoring=<metric>,regularize_length=<flag>,...)`. An empty flag
/// yields `[metric]`; any other value yields `[metric, "length"]`.
///
/// # Errors
///
/// Returns [`Error::Format`] if the line is missing, has no `(`, has fewer than
/// two arguments, or either argument lacks `=`.
///
/// # Example
///
/// ```rust
/// use gama_report::metrics::resolve_metric_configuration;
///
/// let lines = [
///     "Using GAMA version 20.2.0.",
///     "GamaClassifier(scoring=accuracy,regularize_length=True,max_total_time=60)",
/// ];
/// let metrics = resolve_metric_configuration(&lines)?;
/// assert_eq!(metrics.names(), ["accuracy", "length"]);
/// # Ok::<(), gama_report::Error>(())
/// ```
pub fn resolve_metric_configuration<S: AsRef<str>>(lines: &[S]) -> Result<MetricList> {
    let line = lines
        .get(CONFIGURATION_LINE)
        .map(AsRef::as_ref)
        .ok_or_else(|| Error::Format("log has no configuration line".to_string()))?;

    let (_constructor, arguments) = line
        .split_once('(')
        .ok_or_else(|| Error::Format(format!("no '(' in configuration line '{line}'")))?;
    let arguments = arguments.trim_end().trim_end_matches(')');

    let mut arguments = arguments.split(',');
    let (Some(scoring), Some(regularize)) = (arguments.next(), arguments.next()) else {
        return Err(Error::Format(format!(
            "expected at least two arguments in '{line}'"
        )));
    };

    let metric = argument_value(scoring, "scoring")?;
    let regularize = argument_value(regularize, "regularize_length")?;

    let mut names = vec![metric.to_string()];
    if !regularize.is_empty() {
        names.push(LENGTH_METRIC.to_string());
    }
    MetricList::new(names)
        .map_err(|e| Error::Format(format!("unusable metric configuration in '{line}': {e}")))
}

fn argument_value<'a>(argument: &'a str, expected_key: &str) -> Result<&'a str> {
    let (key, value) = argument
        .split_once('=')
        .ok_or_else(|| Error::Format(format!("argument '{argument}' has no '='")))?;
    if key.trim() != expected_key {
        tracing::warn!(
            found = key.trim(),
            expected = expected_key,
            "unexpected configuration argument order"
        );
    }
    Ok(value.trim())
}
