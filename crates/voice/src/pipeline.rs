//! The extraction pipeline: audio event in, candidate transaction out.

use std::{sync::Arc, time::Duration};

use crate::{AudioSource, Extractor, ResultVoice, Stage, Transcriber, VoiceError};

const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// An uncommitted `(amount, category)` pair proposed by a voice event.
///
/// `amount` is still in its lexical form; parsing it is the ledger's job, so
/// a malformed amount is rejected the same way an explicit command's would be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub amount: String,
    pub category: String,
    pub transcript: String,
}

/// Runs the three stages strictly in order, each bounded by one timeout.
///
/// A stage failure is terminal for the event; the pipeline never retries.
/// Whoever wants another attempt sends another event.
pub struct Pipeline {
    audio: Arc<dyn AudioSource>,
    transcriber: Arc<dyn Transcriber>,
    extractor: Arc<dyn Extractor>,
    stage_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        audio: Arc<dyn AudioSource>,
        transcriber: Arc<dyn Transcriber>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            audio,
            transcriber,
            extractor,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Override the per-stage timeout (defaults to 30s).
    #[must_use]
    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        stage: Stage,
        fut: impl Future<Output = ResultVoice<T>>,
    ) -> ResultVoice<T> {
        tokio::time::timeout(self.stage_timeout, fut)
            .await
            .map_err(|_| VoiceError::Timeout(stage))?
    }

    /// Turn an audio event into a [`Candidate`], or fail with the first
    /// stage error encountered.
    ///
    /// `allowed_categories` must be the account's *current* list; it is
    /// forwarded to the extractor as a closed enumeration. The returned
    /// candidate is unvalidated: the commit re-checks everything against
    /// live state.
    pub async fn run(&self, event: &str, allowed_categories: &[String]) -> ResultVoice<Candidate> {
        let audio = self
            .bounded(Stage::Download, self.audio.download_audio(event))
            .await?;
        tracing::debug!(event, bytes = audio.len(), "audio acquired");

        let transcript = self
            .bounded(Stage::Transcribe, self.transcriber.transcribe(&audio))
            .await?;
        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            return Err(VoiceError::TranscriptionFailed(
                "empty transcript".to_string(),
            ));
        }
        tracing::debug!(event, transcript, "transcribed");

        let extraction = self
            .bounded(
                Stage::Extract,
                self.extractor.extract(&transcript, allowed_categories),
            )
            .await?;
        tracing::debug!(event, ?extraction, "extracted");

        let amount = extraction.amount.filter(|s| !s.trim().is_empty());
        let category = extraction.category.filter(|s| !s.trim().is_empty());
        match (amount, category) {
            (Some(amount), Some(category)) => Ok(Candidate {
                amount,
                category,
                transcript,
            }),
            _ => Err(VoiceError::AmbiguousUtterance { transcript }),
        }
    }
}
