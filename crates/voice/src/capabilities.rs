//! Capability traits for the external services the pipeline depends on.
//!
//! All three are object-safe and `Send + Sync`, so the pipeline holds them
//! as trait objects and tests substitute in-process fakes.

use async_trait::async_trait;

use crate::ResultVoice;

/// Fetches the raw audio bytes for an event.
///
/// The `event` string is source-specific: a Telegram file id for
/// [`TelegramAudioSource`], a filesystem path for [`FsAudioSource`].
///
/// [`TelegramAudioSource`]: crate::TelegramAudioSource
/// [`FsAudioSource`]: crate::FsAudioSource
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn download_audio(&self, event: &str) -> ResultVoice<Vec<u8>>;
}

/// Speech-to-text over raw audio bytes.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> ResultVoice<String>;
}

/// What the structured extractor answered for a transcript.
///
/// Both fields are `None` when the model judged the utterance unclear; the
/// pipeline turns that into [`AmbiguousUtterance`], not a hard failure.
///
/// [`AmbiguousUtterance`]: crate::VoiceError::AmbiguousUtterance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Signed decimal lexical form, e.g. `"-20.00"`.
    pub amount: Option<String>,
    /// One of the allowed categories supplied with the request.
    pub category: Option<String>,
}

/// Derives a structured `(amount, category)` pair from a transcript.
///
/// `allowed_categories` is passed through as a closed enumeration the
/// extractor must pick from.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, transcript: &str, allowed_categories: &[String])
    -> ResultVoice<Extraction>;
}
