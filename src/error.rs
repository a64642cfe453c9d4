//! Error kinds for the transcode path, plus the positioned wrapper that
//! reports which input record a fatal abort came from.

use thiserror::Error;

/// A single record- or channel-level failure during transcoding.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Date text that matches neither `MM/YYYY` nor `YYYY`.
    /// Carries the offending input verbatim for diagnostics.
    #[error("unrecognized date format {text:?}")]
    MalformedDate { text: String },

    /// A required field is missing or has a shape the column cannot accept.
    #[error("field {field:?}: {problem}")]
    RecordShape { field: String, problem: String },

    /// The destination rejected a write. Always fatal for the whole
    /// transcode; the channel cannot be meaningfully resumed.
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// The record source itself failed to produce a record (I/O, bad JSON).
    #[error("record source failed: {0}")]
    Source(#[source] anyhow::Error),
}

impl TranscodeError {
    pub(crate) fn missing_field(field: &str) -> Self {
        Self::RecordShape {
            field: field.to_string(),
            problem: "missing required field".to_string(),
        }
    }

    pub(crate) fn bad_field(field: &str, problem: impl Into<String>) -> Self {
        Self::RecordShape { field: field.to_string(), problem: problem.into() }
    }
}

/// A [`TranscodeError`] pinned to the 0-based index of the input record
/// that triggered it. This is what a failed load returns.
#[derive(Debug, Error)]
#[error("record {index}: {kind}")]
pub struct LoadError {
    pub index: u64,
    #[source]
    pub kind: TranscodeError,
}

impl LoadError {
    pub(crate) fn at(index: u64, kind: TranscodeError) -> Self {
        Self { index, kind }
    }
}
