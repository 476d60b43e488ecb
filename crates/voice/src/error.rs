//! The module contains the errors the voice pipeline can throw.
//!
//! Each stage of the pipeline fails with its own variant so the caller can
//! tell "could not fetch the audio" from "heard you, but no transaction was
//! in it". [`AmbiguousUtterance`] carries the transcript for echoing back.
//!
//! [`AmbiguousUtterance`]: VoiceError::AmbiguousUtterance

use std::fmt;

use thiserror::Error;

/// Pipeline stage names, used by [`VoiceError::Timeout`] and log events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Download,
    Transcribe,
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Download => "download",
            Stage::Transcribe => "transcribe",
            Stage::Extract => "extract",
        };
        f.write_str(name)
    }
}

/// Voice pipeline custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Media unavailable: {0}")]
    MediaUnavailable(String),
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    /// The extractor answered, but the utterance held no clear transaction.
    #[error("No transaction in utterance: {transcript}")]
    AmbiguousUtterance { transcript: String },
    #[error("Stage timed out: {0}")]
    Timeout(Stage),
}
