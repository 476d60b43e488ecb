//! Voice-to-candidate extraction.
//!
//! Turns an audio event into an unvalidated candidate transaction through
//! three external capabilities: a media source, a speech-to-text service and
//! a structured extractor. The pipeline does no ledger writes; the caller
//! commits the candidate through the engine.

pub use capabilities::{AudioSource, Extraction, Extractor, Transcriber};
pub use error::{Stage, VoiceError};
pub use fs::FsAudioSource;
pub use openai::{OpenAiExtractor, OpenAiTranscriber};
pub use pipeline::{Candidate, Pipeline};
pub use telegram::TelegramAudioSource;

mod capabilities;
mod error;
mod fs;
mod openai;
mod pipeline;
mod telegram;

type ResultVoice<T> = Result<T, VoiceError>;
