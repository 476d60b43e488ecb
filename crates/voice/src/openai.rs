//! OpenAI adapters: speech-to-text and structured extraction.

use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};

use crate::{Extraction, Extractor, ResultVoice, Transcriber, VoiceError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Speech-to-text over the audio-transcriptions endpoint.
///
/// The audio is uploaded as a multipart form (the original bot recorded
/// Telegram voice notes, hence the ogg file name) and the response is
/// requested as plain text.
pub struct OpenAiTranscriber {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTranscriber {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> ResultVoice<String> {
        let failed = |msg: String| VoiceError::TranscriptionFailed(msg);

        let part = Part::bytes(audio.to_vec())
            .file_name("voice.ogg")
            .mime_str("audio/ogg")
            .map_err(|err| failed(format!("audio part: {err}")))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "text");

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|err| failed(format!("request: {err}")))?;

        if !resp.status().is_success() {
            return Err(failed(format!("status: {}", resp.status())));
        }

        resp.text()
            .await
            .map_err(|err| failed(format!("body: {err}")))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// What the model is asked to emit. Null fields mean "no clear transaction".
#[derive(Debug, Deserialize)]
struct ExtractionBody {
    amount: Option<String>,
    category: Option<String>,
}

/// Structured extraction over the chat-completions endpoint.
///
/// The system prompt carries the allowed categories as a closed enumeration
/// and instructs the model to answer with a JSON object holding exactly
/// `amount` and `category`, both null when the utterance holds no clear
/// transaction.
pub struct OpenAiExtractor {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

fn system_prompt(allowed_categories: &[String]) -> String {
    let categories = allowed_categories.join(", ");
    format!(
        "You turn a spoken sentence into a ledger entry. Reply with a JSON \
         object holding exactly two fields: \"amount\", a signed decimal \
         string where negative means money spent and positive means money \
         received, and \"category\", which must be exactly one of: \
         [{categories}]. If the sentence does not clearly state one \
         transaction, set both fields to null."
    )
}

fn parse_extraction(content: &str) -> ResultVoice<Extraction> {
    let body: ExtractionBody = serde_json::from_str(content)
        .map_err(|err| VoiceError::ExtractionFailed(format!("malformed answer: {err}")))?;
    Ok(Extraction {
        amount: body.amount,
        category: body.category,
    })
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    async fn extract(
        &self,
        transcript: &str,
        allowed_categories: &[String],
    ) -> ResultVoice<Extraction> {
        let failed = |msg: String| VoiceError::ExtractionFailed(msg);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(allowed_categories),
                },
                ChatMessage {
                    role: "user",
                    content: transcript.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| failed(format!("request: {err}")))?;

        if !resp.status().is_success() {
            return Err(failed(format!("status: {}", resp.status())));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|err| failed(format!("body: {err}")))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| failed("no answer in response".to_string()))?;

        parse_extraction(&content)
    }
}
