//! Phase timeline
//!
//! A search run goes through three fixed phases. For each phase the first
//! matching start and end events give its duration, and the end event names
//! the algorithm that ran it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::PhaseBoundary;
use crate::events::{EventGroup, PhaseEvent};
use crate::format::LogFormat;
use crate::{Error, Result};

/// Phase names, in reporting order.
pub const PHASES: [&str; 3] = ["preprocessing", "search", "postprocess"];

/// Timing and algorithm of one execution phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    phase: String,
    algorithm: String,
    started_at: NaiveDateTime,
    ended_at: NaiveDateTime,
}

impl PhaseRecord {
    /// Phase name.
    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Algorithm used in the phase.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Timestamp of the phase-start event.
    #[must_use]
    pub const fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Timestamp of the phase-end event.
    #[must_use]
    pub const fn ended_at(&self) -> NaiveDateTime {
        self.ended_at
    }

    /// Phase duration in seconds (never negative).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f64 {
        let elapsed = self.ended_at - self.started_at;
        elapsed
            .num_microseconds()
            .map_or_else(|| elapsed.num_milliseconds() as f64 / 1e3, |us| us as f64 / 1e6)
    }
}

/// Build one [`PhaseRecord`] per entry of [`PHASES`], in that order.
///
/// # Errors
///
/// - [`Error::PhaseNotFound`] if a phase has no start or no end event
/// - [`Error::Parse`] if a phase event is malformed, a timestamp does not
///   match the format, or a phase ends before it starts
pub fn extract_phases(events: &EventGroup, format: &LogFormat) -> Result<Vec<PhaseRecord>> {
    let starts = typed(events.events(&format.tokens.phase_start))?;
    let ends = typed(events.events(&format.tokens.phase_end))?;

    let phases = PHASES
        .iter()
        .map(|&phase| {
            let start = find(&starts, phase, PhaseBoundary::Start)?;
            let end = find(&ends, phase, PhaseBoundary::End)?;

            let started_at = format.parse_timestamp(start.log_time)?;
            let ended_at = format.parse_timestamp(end.log_time)?;
            if ended_at < started_at {
                return Err(Error::Parse(format!(
                    "phase '{phase}' ends ({ended_at}) before it starts ({started_at})"
                )));
            }

            Ok(PhaseRecord {
                phase: phase.to_string(),
                algorithm: end.algorithm.to_string(),
                started_at,
                ended_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(phases = phases.len(), "resolved phase timeline");
    Ok(phases)
}

fn typed(fields: &[Vec<String>]) -> Result<Vec<PhaseEvent<'_>>> {
    fields.iter().map(|f| PhaseEvent::from_fields(f)).collect()
}

fn find<'a>(
    events: &[PhaseEvent<'a>],
    phase: &str,
    boundary: PhaseBoundary,
) -> Result<PhaseEvent<'a>> {
    events
        .iter()
        .find(|event| event.phase.contains(phase))
        .copied()
        .ok_or_else(|| Error::PhaseNotFound {
            phase: phase.to_string(),
            boundary,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_lines(skip: Option<&str>) -> Vec<String> {
        let mut lines = vec![
            "PLE;PH_START;preprocessing;default;2020-01-01 10:00:00,000000;END!",
            "PLE;PH_END;preprocessing;default;2020-01-01 10:00:01,500000;END!",
            "PLE;PH_START;search;AsyncEA;2020-01-01 10:00:01,600000;END!",
            "PLE;PH_END;search;AsyncEA;2020-01-01 10:01:01,600000;END!",
            "PLE;PH_START;postprocess;BestFitPostProcessing;2020-01-01 10:01:02,000000;END!",
            "PLE;PH_END;postprocess;BestFitPostProcessing;2020-01-01 10:01:04,000000;END!",
        ];
        if let Some(skip) = skip {
            lines.retain(|l| !l.contains(skip));
        }
        lines.into_iter().map(String::from).collect()
    }

    fn phases(lines: &[String]) -> Result<Vec<PhaseRecord>> {
        let format = LogFormat::default();
        extract_phases(&EventGroup::from_lines(lines, &format), &format)
    }

    #[test]
    fn test_fixed_order_and_durations() {
        let mut lines = phase_lines(None);
        lines.reverse();
        let phases = phases(&lines).unwrap();

        let names: Vec<&str> = phases.iter().map(PhaseRecord::phase).collect();
        assert_eq!(names, PHASES);
        assert!((phases[0].duration() - 1.5).abs() < 1e-9);
        assert!((phases[1].duration() - 60.0).abs() < 1e-9);
        assert_eq!(phases[1].algorithm(), "AsyncEA");
        assert_eq!(phases[2].algorithm(), "BestFitPostProcessing");
    }

    #[test]
    fn test_missing_end_event() {
        let lines = phase_lines(Some("PH_END;search"));
        let err = phases(&lines).unwrap_err();
        assert!(matches!(
            err,
            Error::PhaseNotFound { ref phase, boundary: PhaseBoundary::End } if phase == "search"
        ));
    }

    #[test]
    fn test_missing_start_event() {
        let lines = phase_lines(Some("PH_START;preprocessing"));
        assert!(matches!(
            phases(&lines),
            Err(Error::PhaseNotFound {
                boundary: PhaseBoundary::Start,
                ..
            })
        ));
    }

    #[test]
    fn test_first_matching_event_wins() {
        let mut lines = phase_lines(None);
        lines.push("PLE;PH_END;search;Other;2020-01-01 11:00:00,000000;END!".to_string());
        let phases = phases(&lines).unwrap();
        assert_eq!(phases[1].algorithm(), "AsyncEA");
    }

    #[test]
    fn test_end_before_start_rejected() {
        let lines: Vec<String> = phase_lines(None)
            .into_iter()
            .map(|l| l.replace("10:01:01,600000", "09:00:00,000000"))
            .collect();
        assert!(matches!(phases(&lines), Err(Error::Parse(_))));
    }

    #[test]
    fn test_bad_timestamp() {
        let lines: Vec<String> = phase_lines(None)
            .into_iter()
            .map(|l| l.replace("2020-01-01 10:00:00,000000", "yesterday"))
            .collect();
        assert!(matches!(phases(&lines), Err(Error::Parse(_))));
    }
}
