//! Telegram Bot API media source.
//!
//! Resolves a voice-message file id through `getFile`, then downloads the
//! payload from the file endpoint. Every transport or API failure maps to
//! [`MediaUnavailable`]; the pipeline does not care which leg broke.
//!
//! [`MediaUnavailable`]: VoiceError::MediaUnavailable

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{AudioSource, ResultVoice, VoiceError};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Response envelope shared by all Bot API methods.
#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

pub struct TelegramAudioSource {
    client: Client,
    token: String,
    base_url: String,
}

impl TelegramAudioSource {
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self::with_base_url(client, token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client: Client,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn resolve_file_path(&self, file_id: &str) -> ResultVoice<String> {
        let unavailable = |msg: String| VoiceError::MediaUnavailable(msg);

        let resp = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|err| unavailable(format!("getFile request: {err}")))?;

        let envelope: TelegramResponse<FileInfo> = resp
            .json()
            .await
            .map_err(|err| unavailable(format!("getFile response: {err}")))?;

        if !envelope.ok {
            return Err(unavailable(format!(
                "getFile rejected: {}",
                envelope.description.unwrap_or_default()
            )));
        }

        envelope
            .result
            .and_then(|info| info.file_path)
            .ok_or_else(|| unavailable("getFile returned no file path".to_string()))
    }
}

#[async_trait]
impl AudioSource for TelegramAudioSource {
    async fn download_audio(&self, event: &str) -> ResultVoice<Vec<u8>> {
        let file_path = self.resolve_file_path(event).await?;

        let resp = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|err| VoiceError::MediaUnavailable(format!("file download: {err}")))?;

        if !resp.status().is_success() {
            return Err(VoiceError::MediaUnavailable(format!(
                "file download status: {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|err| VoiceError::MediaUnavailable(format!("file download body: {err}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_embed_token_and_path() {
        let source = TelegramAudioSource::new(Client::new(), "TOKEN");
        assert_eq!(
            source.method_url("getFile"),
            "https://api.telegram.org/botTOKEN/getFile"
        );
        assert_eq!(
            source.file_url("voice/file_7.oga"),
            "https://api.telegram.org/file/botTOKEN/voice/file_7.oga"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source =
            TelegramAudioSource::with_base_url(Client::new(), "TOKEN", "http://localhost:8081/");
        assert_eq!(
            source.method_url("getFile"),
            "http://localhost:8081/botTOKEN/getFile"
        );
    }
}
