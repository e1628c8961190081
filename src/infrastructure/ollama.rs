//! Ollama client for item generation (OpenAI-compatible chat API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{ChatMessage, LlmError, LlmPort, LlmRequest, LlmResponse};

/// Client for Ollama's `/chat/completions` endpoint
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn build_body(&self, request: &LlmRequest) -> ChatCompletionRequest {
        let system = request.system_prompt.as_deref().map(ChatMessage::system);
        let messages = system
            .iter()
            .chain(request.messages.iter())
            .map(|m| WireMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect();

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl LlmPort for OllamaClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = self.build_body(&request);
        let mut http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        let response = http.send().await.map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        into_llm_response(completion, &self.model)
    }
}

fn map_reqwest_error(error: reqwest::Error, timeout: Option<Duration>) -> LlmError {
    match timeout {
        Some(timeout) if error.is_timeout() => LlmError::Timeout(timeout),
        _ => LlmError::Transport(error.to_string()),
    }
}

fn into_llm_response(
    completion: ChatCompletionResponse,
    requested_model: &str,
) -> Result<LlmResponse, LlmError> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))?;

    Ok(LlmResponse {
        content,
        model: completion.model.unwrap_or_else(|| requested_model.to_string()),
        tokens_used: completion.usage.map(|u| u.total_tokens).unwrap_or(0),
    })
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}
