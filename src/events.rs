//! Parseable log events
//!
//! Lines framed by the start/end markers are split on the delimiter and
//! grouped by their event-type token. Everything else in the log (free-form
//! messages, the configuration line) is ignored here.
//!
//! ```text
//! PLE;EVAL;<time>;<duration>;<process_duration>;<fitness>;<id>;<pipeline>;<log_time>;END!
//!      │    └──────────────────────────── fields ───────────────────────────────┘
//!      └ token
//! ```

use rustc_hash::FxHashMap;

use crate::format::{EventTokens, LogFormat};
use crate::{Error, Result};

/// Field-lists of framed events, grouped by event-type token.
///
/// Tokens keep the order of their first occurrence and, within a token,
/// events keep log order. Built once per report and never modified
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventGroup {
    events: FxHashMap<String, Vec<Vec<String>>>,
    order: Vec<String>,
    total: usize,
}

impl EventGroup {
    /// Tokenize and group the framed events found in `lines`.
    #[must_use]
    pub fn from_lines<S: AsRef<str>>(lines: &[S], format: &LogFormat) -> Self {
        let mut group = Self::default();

        for line in lines {
            let line = line.as_ref().trim();
            if !line.starts_with(&format.start_marker) || !line.ends_with(&format.end_marker) {
                continue;
            }

            let tokens: Vec<&str> = line.split(format.delimiter.as_str()).collect();
            // Markers plus at least the event-type token
            if tokens.len() < 3 {
                tracing::debug!(line, "framed line without event token skipped");
                continue;
            }

            let inner = &tokens[1..tokens.len() - 1];
            let fields = inner[1..].iter().map(|f| (*f).to_string()).collect();
            let token = inner[0];
            if !group.events.contains_key(token) {
                group.order.push(token.to_string());
            }
            group
                .events
                .entry(token.to_string())
                .or_default()
                .push(fields);
            group.total += 1;
        }

        tracing::debug!(
            framed = group.total,
            tokens = group.events.len(),
            "grouped parseable log events"
        );
        group
    }

    /// Field-lists for `token`, in log order. Empty if the token never occurred.
    #[must_use]
    pub fn events(&self, token: &str) -> &[Vec<String>] {
        self.events.get(token).map_or(&[], Vec::as_slice)
    }

    /// Interpret every event according to its token.
    ///
    /// Events are returned grouped by token, tokens in first-seen order and
    /// log order within a token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for the first known event with the wrong arity.
    pub fn parsed<'a>(&'a self, tokens: &EventTokens) -> Result<Vec<ParsedEvent<'a>>> {
        self.tokens()
            .flat_map(move |token| {
                self.events(token)
                    .iter()
                    .map(move |fields| (token, fields))
            })
            .map(|(token, fields)| ParsedEvent::parse(token, fields, tokens))
            .collect()
    }

    /// Event-type tokens present in the log, in order of first occurrence.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Total number of framed events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.total
    }

    /// Whether no framed event was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Fields of an evaluation-result event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationEvent<'a> {
    /// Evaluation start timestamp.
    pub time: &'a str,
    /// Wall-clock duration in seconds.
    pub duration: &'a str,
    /// Process time in seconds.
    pub process_duration: &'a str,
    /// Fitness tuple, `(v1,...,vk)`.
    pub fitness: &'a str,
    /// Candidate id.
    pub id: &'a str,
    /// Serialized candidate.
    pub pipeline: &'a str,
    /// Timestamp at which the event was logged.
    pub log_time: &'a str,
}

impl<'a> EvaluationEvent<'a> {
    /// Number of fields of an evaluation event.
    pub const ARITY: usize = 7;

    /// View `fields` as an evaluation event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the field count is not [`Self::ARITY`].
    pub fn from_fields(fields: &'a [String]) -> Result<Self> {
        match fields {
            [time, duration, process_duration, fitness, id, pipeline, log_time] => Ok(Self {
                time,
                duration,
                process_duration,
                fitness,
                id,
                pipeline,
                log_time,
            }),
            _ => Err(arity_error("evaluation", Self::ARITY, fields)),
        }
    }
}

/// Fields of a phase-start or phase-end event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEvent<'a> {
    /// Phase name.
    pub phase: &'a str,
    /// Algorithm used in the phase.
    pub algorithm: &'a str,
    /// Timestamp at which the event was logged.
    pub log_time: &'a str,
}

impl<'a> PhaseEvent<'a> {
    /// Number of fields of a phase event.
    pub const ARITY: usize = 3;

    /// View `fields` as a phase event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the field count is not [`Self::ARITY`].
    pub fn from_fields(fields: &'a [String]) -> Result<Self> {
        match fields {
            [phase, algorithm, log_time] => Ok(Self {
                phase,
                algorithm,
                log_time,
            }),
            _ => Err(arity_error("phase", Self::ARITY, fields)),
        }
    }
}

/// A framed event interpreted according to its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEvent<'a> {
    /// Candidate evaluation result.
    Evaluation(EvaluationEvent<'a>),
    /// Start of a phase.
    PhaseStart(PhaseEvent<'a>),
    /// End of a phase.
    PhaseEnd(PhaseEvent<'a>),
    /// Any other token; fields kept untyped.
    Other {
        /// Event-type token
        token: &'a str,
        /// Raw fields
        fields: &'a [String],
    },
}

impl<'a> ParsedEvent<'a> {
    /// Interpret `fields` according to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if a known event kind has the wrong arity.
    pub fn parse(token: &'a str, fields: &'a [String], tokens: &EventTokens) -> Result<Self> {
        if token == tokens.evaluation_result {
            EvaluationEvent::from_fields(fields).map(Self::Evaluation)
        } else if token == tokens.phase_start {
            PhaseEvent::from_fields(fields).map(Self::PhaseStart)
        } else if token == tokens.phase_end {
            PhaseEvent::from_fields(fields).map(Self::PhaseEnd)
        } else {
            Ok(Self::Other { token, fields })
        }
    }
}

fn arity_error(kind: &str, expected: usize, fields: &[String]) -> Error {
    Error::Parse(format!(
        "{kind} event has {} fields, expected {expected}: {}",
        fields.len(),
        fields.join(";")
    ))
}
