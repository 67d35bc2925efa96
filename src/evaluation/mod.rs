//! Evaluation results
//!
//! Every `EVAL` event becomes one [`EvaluationRecord`]; the
//! [`EvaluationTable`] keeps them in log order and derives the running
//! best-so-far value of each metric.
//!
//! ```text
//! n │ start │ duration │ <metric>... │ pipeline │ id │ <metric>_cummax...
//! ```

mod record;
mod table;

pub use record::{parse_fitness, EvaluationRecord};
pub use table::EvaluationTable;
