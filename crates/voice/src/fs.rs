//! Filesystem media source, for the operator CLI and tests.

use async_trait::async_trait;

use crate::{AudioSource, ResultVoice, VoiceError};

/// Reads the event string as a local file path.
#[derive(Debug, Default)]
pub struct FsAudioSource;

#[async_trait]
impl AudioSource for FsAudioSource {
    async fn download_audio(&self, event: &str) -> ResultVoice<Vec<u8>> {
        tokio::fs::read(event)
            .await
            .map_err(|err| VoiceError::MediaUnavailable(format!("{event}: {err}")))
    }
}
