//! Evaluation Table - all evaluations plus running best-so-far columns

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMicrosecondArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;

use super::EvaluationRecord;
use crate::events::EvaluationEvent;
use crate::format::LogFormat;
use crate::metrics::MetricList;
use crate::topk::{top_k_indices, SortOrder};
use crate::{Error, Result};

/// Every evaluation of a search run in log order, with one cumulative-maximum
/// column per metric.
///
/// `cummax(m)[i]` is the best value of metric `m` over rows `0..=i`, so the
/// column never decreases along the table. A row whose own value is NaN
/// reads NaN; later rows still carry the maximum of the non-NaN values.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTable {
    metrics: MetricList,
    records: Vec<EvaluationRecord>,
    cummax: Vec<Vec<f64>>,
}

impl EvaluationTable {
    /// Build the table from evaluation field-lists in log order.
    ///
    /// When `metrics` is `None`, names are synthesized from the arity of the
    /// first fitness tuple.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if an event has the wrong field count, a
    /// field cannot be converted, fitness arities disagree (with each other or
    /// with `metrics`), or metrics must be inferred from an empty log.
    pub fn build(
        events: &[Vec<String>],
        metrics: Option<MetricList>,
        format: &LogFormat,
    ) -> Result<Self> {
        let records = events
            .iter()
            .enumerate()
            .map(|(n, fields)| {
                let event = EvaluationEvent::from_fields(fields)?;
                EvaluationRecord::from_event(n, &event, format)
            })
            .collect::<Result<Vec<_>>>()?;

        let metrics = match metrics {
            Some(metrics) => metrics,
            None => {
                let first = records.first().ok_or_else(|| {
                    Error::Parse("cannot infer metrics: the log has no evaluations".to_string())
                })?;
                MetricList::inferred(first.scores().len())?
            }
        };

        if let Some(bad) = records.iter().find(|r| r.scores().len() != metrics.len()) {
            return Err(Error::Parse(format!(
                "evaluation {} ({}) has {} fitness values, expected {} for metrics {:?}",
                bad.n(),
                bad.id(),
                bad.scores().len(),
                metrics.len(),
                metrics.names()
            )));
        }

        let cummax = (0..metrics.len())
            .map(|m| running_max(records.iter().map(|r| r.scores()[m])))
            .collect();

        tracing::debug!(
            rows = records.len(),
            metrics = metrics.len(),
            "built evaluation table"
        );

        Ok(Self {
            metrics,
            records,
            cummax,
        })
    }

    /// Metric names, in column order.
    #[must_use]
    pub const fn metrics(&self) -> &MetricList {
        &self.metrics
    }

    /// All rows, in log order.
    #[must_use]
    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log contained no evaluations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row `n`.
    #[must_use]
    pub fn get(&self, n: usize) -> Option<&EvaluationRecord> {
        self.records.get(n)
    }

    /// First row evaluating candidate `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&EvaluationRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Values of metric `name`, in row order.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<Vec<f64>> {
        let m = self.metrics.position(name)?;
        Some(self.records.iter().map(|r| r.scores()[m]).collect())
    }

    /// Cumulative maximum of metric `name`, in row order.
    #[must_use]
    pub fn cummax(&self, name: &str) -> Option<&[f64]> {
        let m = self.metrics.position(name)?;
        self.cummax.get(m).map(Vec::as_slice)
    }

    /// First row holding the maximum of metric `name`.
    #[must_use]
    pub fn best(&self, name: &str) -> Option<&EvaluationRecord> {
        self.top_k(name, 1, SortOrder::Descending)?.into_iter().next()
    }

    /// The `k` best rows by metric `name`; ties keep log order.
    #[must_use]
    pub fn top_k(&self, name: &str, k: usize, order: SortOrder) -> Option<Vec<&EvaluationRecord>> {
        let values = self.metric(name)?;
        Some(
            top_k_indices(&values, k, order)
                .into_iter()
                .map(|i| &self.records[i])
                .collect(),
        )
    }

    /// Candidate ids paired with their serialized pipelines, in row order.
    pub fn pipelines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().map(|r| (r.id(), r.pipeline()))
    }

    /// Export the table as an Arrow record batch.
    ///
    /// Columns: `n`, `start`, `duration`, one per metric, `pipeline`, `id`,
    /// then `<metric>_cummax` per metric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arrow`] if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = vec![
            Field::new("n", DataType::UInt64, false),
            Field::new("start", DataType::Timestamp(TimeUnit::Microsecond, None), false),
            Field::new("duration", DataType::Float64, false),
        ];
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from_iter_values(
                self.records.iter().map(|r| r.n() as u64),
            )),
            Arc::new(TimestampMicrosecondArray::from_iter_values(
                self.records.iter().map(|r| r.start().and_utc().timestamp_micros()),
            )),
            Arc::new(Float64Array::from_iter_values(
                self.records.iter().map(EvaluationRecord::duration),
            )),
        ];

        for (m, name) in self.metrics.iter().enumerate() {
            fields.push(Field::new(name, DataType::Float64, false));
            columns.push(Arc::new(Float64Array::from_iter_values(
                self.records.iter().map(|r| r.scores()[m]),
            )));
        }

        fields.push(Field::new("pipeline", DataType::Utf8, false));
        columns.push(Arc::new(StringArray::from_iter_values(
            self.records.iter().map(EvaluationRecord::pipeline),
        )));
        fields.push(Field::new("id", DataType::Utf8, false));
        columns.push(Arc::new(StringArray::from_iter_values(
            self.records.iter().map(EvaluationRecord::id),
        )));

        for (name, cummax) in self.metrics.iter().zip(&self.cummax) {
            fields.push(Field::new(format!("{name}_cummax"), DataType::Float64, false));
            columns.push(Arc::new(Float64Array::from(cummax.clone())));
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }
}

/// Running maximum in iteration order.
///
/// A NaN row stays NaN in the output but does not reset the maximum carried
/// to later rows.
fn running_max(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values
        .scan(f64::NAN, |best, value| {
            if value.is_nan() {
                return Some(f64::NAN);
            }
            *best = best.max(value);
            Some(*best)
        })
        .collect()
}
