/*!
 * Tests for error types and conversions
 */

use vocaboost::errors::{AudioError, ConfigError, PipelineError, SynthesisError, TagError};

#[test]
fn test_configError_invalidLoopCount_shouldShowLineAndValue() {
    let error = ConfigError::InvalidLoopCount { line: 7, value: "abc".to_string() };
    let display = format!("{}", error);
    assert!(display.contains("line 7"));
    assert!(display.contains("\"abc\""));
}

#[test]
fn test_configError_fieldCount_shouldShowCounts() {
    let error = ConfigError::FieldCount { line: 3, found: 6, expected: 8 };
    let display = format!("{}", error);
    assert!(display.contains("6 fields"));
    assert!(display.contains("expected 8"));
}

#[test]
fn test_synthesisError_apiError_shouldDisplayStatusAndMessage() {
    let error = SynthesisError::ApiError {
        status_code: 400,
        message: "Invalid voice".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("400"));
    assert!(display.contains("Invalid voice"));
}

#[test]
fn test_pipelineError_kind_shouldNameEachSource() {
    let cases: Vec<(PipelineError, &str)> = vec![
        (ConfigError::Script("bad".to_string()).into(), "config"),
        (SynthesisError::EmptyText.into(), "synthesis"),
        (AudioError::InvalidLoopCount(0).into(), "audio"),
        (
            TagError::Write { path: "a.mp3".to_string(), message: "x".to_string() }.into(),
            "tag",
        ),
        (std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into(), "io"),
    ];

    for (error, kind) in cases {
        assert_eq!(error.kind(), kind, "{}", error);
    }
}

#[test]
fn test_pipelineError_fromSynthesisError_shouldWrapCorrectly() {
    let error: PipelineError = SynthesisError::QuotaExceeded("daily limit".to_string()).into();
    let display = format!("{}", error);
    assert!(display.contains("Synthesis error"));
    assert!(display.contains("daily limit"));
}
