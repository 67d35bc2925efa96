//! Tests for error types

use gama_report::error::PhaseBoundary;
use gama_report::{CandidateError, Error};

#[test]
fn test_argument_error() {
    let error = Error::Argument("both given".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid arguments"));
    assert!(error_str.contains("both given"));
}

#[test]
fn test_format_error() {
    let error = Error::Format("no '('".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Malformed configuration line"));
    assert!(error_str.contains("no '('"));
}

#[test]
fn test_phase_not_found_error() {
    let error = Error::PhaseNotFound {
        phase: "search".to_string(),
        boundary: PhaseBoundary::End,
    };
    assert_eq!(format!("{error}"), "No end event found for phase 'search'");

    let error = Error::PhaseNotFound {
        phase: "postprocess".to_string(),
        boundary: PhaseBoundary::Start,
    };
    assert!(format!("{error}").contains("No start event"));
}

#[test]
fn test_parse_error() {
    let error = Error::Parse("fitness '(x)'".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Log parse error"));
    assert!(error_str.contains("fitness '(x)'"));
}

#[test]
fn test_config_error() {
    let error = Error::Config("'delimiter' must not be empty".to_string());
    assert!(format!("{error}").contains("Invalid log format"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gama.log");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("gama.log"));
}

#[test]
fn test_candidate_error() {
    let error = CandidateError::new("unknown primitive 'X'").with_id("abc");
    assert_eq!(error.id, "abc");
    assert_eq!(
        format!("{error}"),
        "Cannot decode candidate 'abc': unknown primitive 'X'"
    );
}

#[test]
fn test_error_debug() {
    let error = Error::Argument("test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("Argument"));
}
