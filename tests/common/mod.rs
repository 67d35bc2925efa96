//! Synthetic analysis logs shared by the integration tests

#![allow(dead_code)]

pub const HEADER: &str = "Using GAMA version 20.2.0.";
pub const CLASSIFIER: &str =
    "GamaClassifier(scoring=accuracy,regularize_length=True,max_total_time=3600)";

/// One evaluation: fitness tuple, candidate id, pipeline string.
pub type Eval<'a> = (&'a str, &'a str, &'a str);

fn timestamp(second: usize) -> String {
    format!(
        "2020-01-01 {:02}:{:02}:{:02},250000",
        10 + second / 3600,
        (second / 60) % 60,
        second % 60
    )
}

/// Evaluation event line `n`.
pub fn eval_line(n: usize, (fitness, id, pipeline): Eval<'_>) -> String {
    format!(
        "PLE;EVAL;{};0.75;0.5;{fitness};{id};{pipeline};{};END!",
        timestamp(10 + n),
        timestamp(11 + n)
    )
}

/// Complete log: header, configuration line, three phases, evaluations
/// inside the search phase and some free-form noise.
pub fn log_with(configuration: &str, evals: &[Eval<'_>]) -> Vec<String> {
    let search_end = 20 + evals.len();
    let mut lines = vec![
        HEADER.to_string(),
        configuration.to_string(),
        format!("PLE;PH_START;preprocessing;default;{};END!", timestamp(0)),
        "[INFO] preprocessing data".to_string(),
        format!("PLE;PH_END;preprocessing;default;{};END!", timestamp(2)),
        format!("PLE;PH_START;search;AsyncEA;{};END!", timestamp(3)),
    ];
    for (n, eval) in evals.iter().enumerate() {
        lines.push(eval_line(n, *eval));
        if n % 2 == 0 {
            lines.push(format!("PLE;MUT;{};mut_replace_terminal;END!", eval.1));
        }
    }
    lines.extend([
        format!("PLE;PH_END;search;AsyncEA;{};END!", timestamp(search_end)),
        format!(
            "PLE;PH_START;postprocess;BestFitPostProcessing;{};END!",
            timestamp(search_end + 1)
        ),
        format!(
            "PLE;PH_END;postprocess;BestFitPostProcessing;{};END!",
            timestamp(search_end + 4)
        ),
        "[INFO] done".to_string(),
    ]);
    lines
}

/// Log of a regularized accuracy search with the given evaluations.
pub fn log(evals: &[Eval<'_>]) -> Vec<String> {
    log_with(CLASSIFIER, evals)
}

pub const SAMPLE: &[Eval<'static>] = &[
    ("(0.71,-1)", "id-0", "GaussianNB(data)"),
    (
        "(0.84,-2)",
        "id-1",
        "LogisticRegression(MinMaxScaler(data), LogisticRegression.C=0.5, LogisticRegression.penalty='l1')",
    ),
    ("(0.80,-1)", "id-2", "BernoulliNB(data, alpha=1.0, fit_prior=True)"),
    (
        "(0.91,-3)",
        "id-3",
        "RandomForestClassifier(PCA(Binarizer(data, Binarizer.threshold=0.3), PCA.iterated_power=4), RandomForestClassifier.n_estimators=100)",
    ),
    ("(0.88,-1)", "id-4", "KNeighborsClassifier(data, KNeighborsClassifier.n_neighbors=7)"),
];
