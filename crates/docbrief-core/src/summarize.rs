//! Summarization service collaborator.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str = "Summarize medical reports.";
const DEFAULT_MAX_TOKENS: u32 = 200;

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("summarization API error: {0}")]
    Api(String),
    #[error("response carried no summary content")]
    MissingContent,
}

/// An upstream text-to-text summarization function.
///
/// Accepts arbitrarily long text; callers do not pre-truncate.
pub trait Summarizer: Send + Sync {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizationError>> + Send + 'a>>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Summarize via an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiSummarizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(120),
        }
    }

    /// Point at a different OpenAI-compatible endpoint (Groq, Together, a
    /// local server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Summarizer for OpenAiSummarizer {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizationError>> + Send + 'a>> {
        Box::pin(async move {
            let request = ChatRequest {
                model: &self.model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: &self.system_prompt,
                    },
                    ChatMessage {
                        role: "user",
                        content: text,
                    },
                ],
                max_tokens: self.max_tokens,
            };

            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .timeout(self.timeout)
                .json(&request)
                .send()
                .await?;

            let status = resp.status();
            let body: ChatResponse = match resp.json().await {
                Ok(body) => body,
                Err(_) if !status.is_success() => {
                    return Err(SummarizationError::Api(format!("HTTP {}", status)));
                }
                Err(e) => return Err(SummarizationError::Http(e)),
            };

            if let Some(error) = body.error {
                return Err(SummarizationError::Api(error.message));
            }
            if !status.is_success() {
                return Err(SummarizationError::Api(format!("HTTP {}", status)));
            }

            body.choices
                .and_then(|choices| choices.into_iter().next())
                .map(|choice| choice.message.content.trim().to_string())
                .ok_or(SummarizationError::MissingContent)
        })
    }
}
