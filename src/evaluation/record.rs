//! Evaluation Record - one evaluated candidate

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::events::EvaluationEvent;
use crate::format::LogFormat;
use crate::{Error, Result};

/// One row of the evaluation table.
///
/// Rows are numbered in log order; `scores` holds one value per metric of the
/// owning table, in metric order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    n: usize,
    start: NaiveDateTime,
    duration: f64,
    process_duration: f64,
    scores: Vec<f64>,
    pipeline: String,
    id: String,
    logged_at: NaiveDateTime,
}

impl EvaluationRecord {
    /// Convert a typed evaluation event into row `n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if a timestamp, duration or fitness value
    /// cannot be converted.
    pub fn from_event(n: usize, event: &EvaluationEvent<'_>, format: &LogFormat) -> Result<Self> {
        Ok(Self {
            n,
            start: format.parse_timestamp(event.time)?,
            duration: parse_seconds(event.duration, "duration")?,
            process_duration: parse_seconds(event.process_duration, "process_duration")?,
            scores: parse_fitness(event.fitness)?,
            pipeline: event.pipeline.to_string(),
            id: event.id.to_string(),
            logged_at: format.parse_timestamp(event.log_time)?,
        })
    }

    /// Sequence index in log order.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Evaluation start time.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Wall-clock duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Process time in seconds.
    #[must_use]
    pub const fn process_duration(&self) -> f64 {
        self.process_duration
    }

    /// Metric values, in metric order.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Serialized candidate.
    #[must_use]
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    /// Candidate id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Time at which the evaluation was logged.
    #[must_use]
    pub const fn logged_at(&self) -> NaiveDateTime {
        self.logged_at
    }
}

/// Parse a fitness tuple such as `(0.93,-3)` into its values.
///
/// A trailing comma, as in the one-element tuple `(0.93,)`, is accepted.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the parentheses are missing, the tuple is empty
/// or a value is not a float.
pub fn parse_fitness(fitness: &str) -> Result<Vec<f64>> {
    let inner = fitness
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| Error::Parse(format!("fitness '{fitness}' is not a parenthesized tuple")))?;

    let mut parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    parts
        .into_iter()
        .map(|value| {
            value
                .parse::<f64>()
                .map_err(|e| Error::Parse(format!("fitness value '{value}' in '{fitness}': {e}")))
        })
        .collect()
}

fn parse_seconds(field: &str, name: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::Parse(format!("{name} '{field}' is not a number: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fitness_pair() {
        assert_eq!(parse_fitness("(0.9,5)").unwrap(), vec![0.9, 5.0]);
    }

    #[test]
    fn test_parse_fitness_spaces_and_trailing_comma() {
        assert_eq!(parse_fitness("(0.9, -2)").unwrap(), vec![0.9, -2.0]);
        assert_eq!(parse_fitness("(0.75,)").unwrap(), vec![0.75]);
    }

    #[test]
    fn test_parse_fitness_special_values() {
        let values = parse_fitness("(-inf,-1)").unwrap();
        assert!(values[0].is_infinite() && values[0].is_sign_negative());
    }

    #[test]
    fn test_parse_fitness_rejects_garbage() {
        assert!(matches!(parse_fitness("0.9,5"), Err(Error::Parse(_))));
        assert!(matches!(parse_fitness("()"), Err(Error::Parse(_))));
        assert!(matches!(parse_fitness("(0.9,abc)"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_from_event() {
        let event = EvaluationEvent {
            time: "2020-01-01 10:00:00,000000",
            duration: "1.25",
            process_duration: "1.0",
            fitness: "(0.8,-1)",
            id: "abc",
            pipeline: "GaussianNB(data)",
            log_time: "2020-01-01 10:00:01,250000",
        };
        let record = EvaluationRecord::from_event(4, &event, &LogFormat::default()).unwrap();
        assert_eq!(record.n(), 4);
        assert_eq!(record.scores(), [0.8, -1.0]);
        assert!((record.duration() - 1.25).abs() < f64::EPSILON);
        assert_eq!(record.id(), "abc");
        assert!(record.logged_at() > record.start());
    }

    #[test]
    fn test_from_event_bad_duration() {
        let event = EvaluationEvent {
            time: "2020-01-01 10:00:00,000000",
            duration: "soon",
            process_duration: "1.0",
            fitness: "(0.8,-1)",
            id: "abc",
            pipeline: "GaussianNB(data)",
            log_time: "2020-01-01 10:00:01,250000",
        };
        assert!(matches!(
            EvaluationRecord::from_event(0, &event, &LogFormat::default()),
            Err(Error::Parse(_))
        ));
    }
}
