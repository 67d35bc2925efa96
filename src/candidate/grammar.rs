//! Search-space grammar
//!
//! The grammar lists the primitives a serialized candidate may be built from.
//! The default grammar is the union of the classification and regression
//! search spaces; it is built once per process and only ever read.

use std::sync::{Arc, LazyLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::parser::PipelineParser;
use super::{Candidate, CandidateDecoder};
use crate::error::CandidateError;

/// Role of a primitive within a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Final estimator of a classification pipeline.
    Classifier,
    /// Final estimator of a regression pipeline.
    Regressor,
    /// Data transformation or feature selection step.
    Preprocessor,
}

const CLASSIFIERS: &[&str] = &[
    "BernoulliNB",
    "DecisionTreeClassifier",
    "ExtraTreesClassifier",
    "GaussianNB",
    "GradientBoostingClassifier",
    "KNeighborsClassifier",
    "LinearSVC",
    "LogisticRegression",
    "MultinomialNB",
    "RandomForestClassifier",
];

const REGRESSORS: &[&str] = &[
    "AdaBoostRegressor",
    "DecisionTreeRegressor",
    "ElasticNetCV",
    "ExtraTreesRegressor",
    "GradientBoostingRegressor",
    "KNeighborsRegressor",
    "LassoLarsCV",
    "LinearSVR",
    "RandomForestRegressor",
];

const PREPROCESSORS: &[&str] = &[
    "Binarizer",
    "FastICA",
    "FeatureAgglomeration",
    "MaxAbsScaler",
    "MinMaxScaler",
    "Normalizer",
    "Nystroem",
    "PCA",
    "PolynomialFeatures",
    "RBFSampler",
    "RobustScaler",
    "SelectFwe",
    "SelectPercentile",
    "StandardScaler",
    "VarianceThreshold",
];

static SHARED: LazyLock<Arc<Grammar>> = LazyLock::new(|| {
    let grammar = Grammar::classification().union(&Grammar::regression());
    tracing::debug!(primitives = grammar.len(), "built shared search-space grammar");
    Arc::new(grammar)
});

/// Set of primitives a candidate may use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    primitives: FxHashMap<String, PrimitiveKind>,
}

impl Grammar {
    /// Create an empty grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide default grammar (classification and regression spaces).
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Default classification search space.
    #[must_use]
    pub fn classification() -> Self {
        Self::new()
            .with_primitives(CLASSIFIERS, PrimitiveKind::Classifier)
            .with_primitives(PREPROCESSORS, PrimitiveKind::Preprocessor)
    }

    /// Default regression search space.
    #[must_use]
    pub fn regression() -> Self {
        Self::new()
            .with_primitives(REGRESSORS, PrimitiveKind::Regressor)
            .with_primitives(PREPROCESSORS, PrimitiveKind::Preprocessor)
    }

    /// Add a primitive.
    #[must_use]
    pub fn with_primitive(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.primitives.insert(name.into(), kind);
        self
    }

    fn with_primitives(self, names: &[&str], kind: PrimitiveKind) -> Self {
        names
            .iter()
            .fold(self, |grammar, name| grammar.with_primitive(*name, kind))
    }

    /// Merge two grammars. On conflicting kinds, `self` wins.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = other.clone();
        merged.primitives.extend(
            self.primitives
                .iter()
                .map(|(name, kind)| (name.clone(), *kind)),
        );
        merged
    }

    /// Kind of primitive `name`, if the grammar knows it.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<PrimitiveKind> {
        self.primitives.get(name).copied()
    }

    /// Number of primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the grammar has no primitives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl CandidateDecoder for Grammar {
    fn decode(&self, pipeline: &str) -> Result<Candidate, CandidateError> {
        PipelineParser::new(pipeline, self).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_grammar_is_union() {
        let grammar = Grammar::shared();
        assert_eq!(grammar.kind("GaussianNB"), Some(PrimitiveKind::Classifier));
        assert_eq!(grammar.kind("LassoLarsCV"), Some(PrimitiveKind::Regressor));
        assert_eq!(grammar.kind("PCA"), Some(PrimitiveKind::Preprocessor));
        assert_eq!(grammar.kind("Unknown"), None);
        assert_eq!(
            grammar.len(),
            CLASSIFIERS.len() + REGRESSORS.len() + PREPROCESSORS.len()
        );
    }

    #[test]
    fn test_shared_grammar_single_instance() {
        assert!(Arc::ptr_eq(&Grammar::shared(), &Grammar::shared()));
    }

    #[test]
    fn test_union_prefers_self() {
        let a = Grammar::new().with_primitive("X", PrimitiveKind::Classifier);
        let b = Grammar::new().with_primitive("X", PrimitiveKind::Regressor);
        assert_eq!(a.union(&b).kind("X"), Some(PrimitiveKind::Classifier));
    }
}
