//! Report parsing benchmarks
//!
//! Measures end-to-end construction (tokenize, resolve metrics, phases,
//! evaluation table) and the first candidate decoding pass on synthetic logs.
//!
//! Run with: cargo bench --bench report_parsing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gama_report::Report;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

const PIPELINES: [&str; 3] = [
    "GaussianNB(data)",
    "LogisticRegression(MinMaxScaler(data), LogisticRegression.C=0.5, LogisticRegression.penalty='l1')",
    "RandomForestClassifier(PCA(data, PCA.iterated_power=4), RandomForestClassifier.n_estimators=100)",
];

fn timestamp(second: usize) -> String {
    format!(
        "2020-01-01 {:02}:{:02}:{:02},000000",
        10 + second / 3600,
        (second / 60) % 60,
        second % 60
    )
}

#[allow(clippy::cast_precision_loss)]
fn synthetic_log(evaluations: usize) -> Vec<String> {
    let end = evaluations + 10;
    let mut lines = vec![
        "Using GAMA version 20.2.0.".to_string(),
        "GamaClassifier(scoring=accuracy,regularize_length=True)".to_string(),
        format!("PLE;PH_START;preprocessing;default;{};END!", timestamp(0)),
        format!("PLE;PH_END;preprocessing;default;{};END!", timestamp(1)),
        format!("PLE;PH_START;search;AsyncEA;{};END!", timestamp(2)),
    ];
    for n in 0..evaluations {
        let accuracy = (n % 97) as f64 / 100.0;
        lines.push(format!(
            "PLE;EVAL;{};0.5;0.4;({accuracy},-{});id-{n};{};{};END!",
            timestamp(3 + n),
            n % 3 + 1,
            PIPELINES[n % 3],
            timestamp(4 + n)
        ));
    }
    lines.extend([
        format!("PLE;PH_END;search;AsyncEA;{};END!", timestamp(end)),
        format!("PLE;PH_START;postprocess;BestFit;{};END!", timestamp(end)),
        format!("PLE;PH_END;postprocess;BestFit;{};END!", timestamp(end + 1)),
    ]);
    lines
}

fn bench_report_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_construction");
    for size in SIZES {
        let lines = synthetic_log(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| Report::from_lines(black_box(lines.clone())));
        });
    }
    group.finish();
}

fn bench_candidate_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_decoding");
    for size in SIZES {
        let lines = synthetic_log(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter_with_setup(
                || Report::from_lines(lines.clone()),
                |report| report.map(|r| r.candidates().len()),
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_report_construction, bench_candidate_decoding);
criterion_main!(benches);
