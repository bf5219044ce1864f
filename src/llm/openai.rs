use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AssistantInput, AssistantOutput, LlmError, LlmProvider, LlmResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 50,
        }
    }
}

/// Client for any OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    sampling: SamplingConfig,
}

impl OpenAiProvider {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        model: String,
        base_url: String,
        sampling: SamplingConfig,
    ) -> LlmResult<Self> {
        let api_key = api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            sampling,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, input: &AssistantInput) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &input.system_instruction {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: input.user_message.clone(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
        }
    }

    fn extract_text(resp: ChatCompletionResponse) -> LlmResult<String> {
        resp.choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .find(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

impl LlmProvider for OpenAiProvider {
    async fn generate(&self, input: AssistantInput) -> LlmResult<AssistantOutput> {
        let payload = self.build_request(&input);
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            let body = body.chars().take(400).collect::<String>();
            return Err(LlmError::HttpStatus { status, body });
        }

        let parsed = resp
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|err| LlmError::Parse(err.to_string()))?;
        let text = Self::extract_text(parsed)?;
        Ok(AssistantOutput { text })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
