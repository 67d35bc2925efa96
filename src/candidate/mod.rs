//! Candidate reconstruction
//!
//! Every evaluation row carries its candidate as a serialized pipeline string.
//! A [`CandidateDecoder`] (by default the shared [`Grammar`]) turns those
//! strings into structured [`Candidate`]s; [`CandidateSet`] holds the decoded
//! candidates of one report, keyed by candidate id.
//!
//! ## Usage
//!
//! ```rust
//! use gama_report::candidate::{CandidateDecoder, Grammar, PrimitiveKind};
//!
//! let candidate = Grammar::shared()
//!     .decode("GaussianNB(PCA(data, PCA.n_components=4))")?;
//! assert_eq!(candidate.estimator().primitive(), "GaussianNB");
//! assert_eq!(candidate.preprocessing()[0].kind(), PrimitiveKind::Preprocessor);
//! # Ok::<(), gama_report::CandidateError>(())
//! ```

mod grammar;
mod parser;

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub use grammar::{Grammar, PrimitiveKind};

use crate::error::CandidateError;

/// Decodes serialized candidates into structured ones.
///
/// Implementations must be pure: decoding the same string twice yields the
/// same candidate.
pub trait CandidateDecoder: Send + Sync {
    /// Decode one serialized pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`CandidateError`] if the string does not conform to the
    /// decoder's grammar.
    fn decode(&self, pipeline: &str) -> Result<Candidate, CandidateError>;
}

/// Hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HyperValue {
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// `True` / `False`.
    Bool(bool),
    /// Quoted string or bare word.
    Str(String),
    /// `None`.
    None,
}

impl HyperValue {
    /// Interpret an unquoted literal.
    #[must_use]
    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "True" => Self::Bool(true),
            "False" => Self::Bool(false),
            "None" => Self::None,
            _ => raw
                .parse::<i64>()
                .map(Self::Int)
                .or_else(|_| raw.parse::<f64>().map(Self::Float))
                .unwrap_or_else(|_| Self::Str(raw.to_string())),
        }
    }
}

impl fmt::Display for HyperValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Str(v) => write!(f, "'{v}'"),
            Self::None => f.write_str("None"),
        }
    }
}

/// One primitive of a pipeline with its hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    primitive: String,
    kind: PrimitiveKind,
    hyperparameters: Vec<(String, HyperValue)>,
}

impl Step {
    /// Create a step without hyperparameters.
    #[must_use]
    pub fn new(primitive: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            primitive: primitive.into(),
            kind,
            hyperparameters: Vec::new(),
        }
    }

    /// Add a hyperparameter.
    #[must_use]
    pub fn with_hyperparameter(mut self, name: impl Into<String>, value: HyperValue) -> Self {
        self.hyperparameters.push((name.into(), value));
        self
    }

    /// Primitive name, e.g. `LogisticRegression`.
    #[must_use]
    pub fn primitive(&self) -> &str {
        &self.primitive
    }

    /// Role of the primitive.
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Hyperparameters in serialized order, without the primitive prefix.
    #[must_use]
    pub fn hyperparameters(&self) -> &[(String, HyperValue)] {
        &self.hyperparameters
    }

    /// Value of hyperparameter `name`.
    #[must_use]
    pub fn hyperparameter(&self, name: &str) -> Option<&HyperValue> {
        self.hyperparameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// A structured candidate: preprocessing steps (innermost first) followed by
/// the final estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    preprocessing: Vec<Step>,
    estimator: Step,
}

impl Candidate {
    /// Create a candidate from its steps.
    #[must_use]
    pub const fn new(preprocessing: Vec<Step>, estimator: Step) -> Self {
        Self {
            preprocessing,
            estimator,
        }
    }

    /// Preprocessing steps, in the order they are applied to the data.
    #[must_use]
    pub fn preprocessing(&self) -> &[Step] {
        &self.preprocessing
    }

    /// Final estimator.
    #[must_use]
    pub const fn estimator(&self) -> &Step {
        &self.estimator
    }

    /// All steps, in application order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.preprocessing
            .iter()
            .chain(std::iter::once(&self.estimator))
    }

    /// Number of steps, estimator included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.preprocessing.len() + 1
    }

    /// Always `false`: a candidate has at least its estimator.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Serializes back to the pipeline notation; string values are single-quoted.
impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_step(
            f: &mut fmt::Formatter<'_>,
            steps: &[&Step],
        ) -> fmt::Result {
            let Some((step, inner)) = steps.split_last() else {
                return f.write_str("data");
            };
            write!(f, "{}(", step.primitive)?;
            write_step(f, inner)?;
            for (name, value) in &step.hyperparameters {
                write!(f, ", {}.{name}={value}", step.primitive)?;
            }
            f.write_str(")")
        }

        let steps: Vec<&Step> = self.steps().collect();
        write_step(f, &steps)
    }
}

/// Decoded candidates of one report, keyed by candidate id.
///
/// Decode failures are kept per id next to the successes.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: FxHashMap<String, Candidate>,
    failures: FxHashMap<String, CandidateError>,
}

impl CandidateSet {
    /// Decode every `(id, pipeline)` pair once; repeated ids are decoded only
    /// on their first occurrence.
    pub fn decode_all<'a, I>(pipelines: I, decoder: &dyn CandidateDecoder) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::default();
        for (id, pipeline) in pipelines {
            if set.contains(id) {
                continue;
            }
            match decoder.decode(pipeline) {
                Ok(candidate) => {
                    set.candidates.insert(id.to_string(), candidate);
                }
                Err(error) => {
                    let error = error.with_id(id);
                    tracing::warn!(%error, "candidate could not be decoded");
                    set.failures.insert(id.to_string(), error);
                }
            }
        }
        set
    }

    /// Decoded candidate `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    /// Decode failure of candidate `id`.
    #[must_use]
    pub fn failure(&self, id: &str) -> Option<&CandidateError> {
        self.failures.get(id)
    }

    /// Whether candidate `id` was seen (decoded or failed).
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.candidates.contains_key(id) || self.failures.contains_key(id)
    }

    /// Successfully decoded candidates (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Candidate)> {
        self.candidates.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Decode failures (unordered).
    pub fn failures(&self) -> impl Iterator<Item = &CandidateError> {
        self.failures.values()
    }

    /// Number of decoded candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no candidate was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of candidates that failed to decode.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(HyperValue::from_literal("3"), HyperValue::Int(3));
        assert_eq!(HyperValue::from_literal("0.25"), HyperValue::Float(0.25));
        assert_eq!(HyperValue::from_literal("True"), HyperValue::Bool(true));
        assert_eq!(HyperValue::from_literal("None"), HyperValue::None);
        assert_eq!(
            HyperValue::from_literal("f_classif"),
            HyperValue::Str("f_classif".to_string())
        );
    }

    #[test]
    fn test_display_pipeline_notation() {
        let candidate = Candidate::new(
            vec![Step::new("PCA", PrimitiveKind::Preprocessor)
                .with_hyperparameter("n_components", HyperValue::Int(4))],
            Step::new("LogisticRegression", PrimitiveKind::Classifier)
                .with_hyperparameter("C", HyperValue::Float(1.0))
                .with_hyperparameter("penalty", HyperValue::Str("l2".to_string())),
        );
        assert_eq!(
            candidate.to_string(),
            "LogisticRegression(PCA(data, PCA.n_components=4), \
             LogisticRegression.C=1.0, LogisticRegression.penalty='l2')"
        );
        assert_eq!(Grammar::shared().decode(&candidate.to_string()), Ok(candidate));
    }

    #[test]
    fn test_decode_all_keeps_failures() {
        let pairs = [
            ("a", "GaussianNB(data)"),
            ("b", "NotAPrimitive(data)"),
            ("a", "GaussianNB(data)"),
        ];
        let set = CandidateSet::decode_all(pairs, Grammar::shared().as_ref());

        assert_eq!(set.len(), 1);
        assert_eq!(set.failure_count(), 1);
        assert!(set.get("a").is_some());
        assert_eq!(set.failure("b").map(|e| e.id.as_str()), Some("b"));
        assert!(set.contains("b"));
        assert!(!set.contains("c"));
    }
}
