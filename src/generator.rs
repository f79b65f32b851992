//! OpenAI-compatible chat completion generator (`/v1/chat/completions`).
//!
//! Works with any endpoint speaking the OpenAI chat format: OpenAI itself,
//! Groq, or a local server. All wire types are private to this module.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::GeneratorSettings;
use crate::planner::{GenerateError, Prompt, TextGenerator};

/// Blocking client for a chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    client: Client,
    api_base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleGenerator {
    /// Build a generator from settings and an optional API key.
    ///
    /// When present the key is sent as `Authorization: Bearer <key>`.
    pub fn new(
        settings: &GeneratorSettings,
        api_key: Option<String>,
    ) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| GenerateError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.clone(),
            model: settings.model.clone(),
            api_key,
        })
    }
}

impl TextGenerator for OpenAiCompatibleGenerator {
    fn generate(&self, prompt: &Prompt) -> Result<String, GenerateError> {
        let payload = request_body(&self.model, prompt);
        debug!(
            model = %payload.model,
            temperature = payload.temperature,
            content_len = prompt.user.len(),
            "sending completion request"
        );

        let mut req = self.client.post(&self.api_base_url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().map_err(|e| {
            error!(url = %self.api_base_url, error = %e, "completion request failed (transport)");
            if e.is_timeout() {
                GenerateError::Timeout
            } else {
                GenerateError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                GenerateError::Timeout
            } else {
                GenerateError::Transport(format!("failed to read response body: {e}"))
            }
        })?;

        if !status.is_success() {
            let err = status_error(status, &body);
            error!(%status, error = %err, "completion request returned HTTP error");
            return Err(err);
        }

        reply_text(&body)
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope used by OpenAI and compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn request_body<'a>(model: &'a str, prompt: &'a Prompt) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            Message { role: "system", content: &prompt.system },
            Message { role: "user", content: &prompt.user },
        ],
        temperature: prompt.temperature,
        max_tokens: prompt.max_tokens,
    }
}

/// Map a non-success HTTP status to a typed error.
fn status_error(status: StatusCode, body: &str) -> GenerateError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => format!("HTTP {status}: {}", env.error.message),
        Err(_) => format!("HTTP {status}: {body}"),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerateError::Auth(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GenerateError::Timeout,
        _ => GenerateError::Transport(message),
    }
}

/// Text of the first choice in a completion response body.
fn reply_text(body: &str) -> Result<String, GenerateError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        GenerateError::MalformedResponse(format!("failed to parse response body: {e}"))
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            GenerateError::MalformedResponse("empty or missing content in response".into())
        })
}
