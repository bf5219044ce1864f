//! Language-model boundary: the provider seam, its error type, and the
//! system prompt every reply is generated under.

pub mod openai;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const SHOPPING_SYSTEM_PROMPT: &str = r#"You are a helpful shopping assistant.

IMPORTANT RULES:
- Keep responses VERY SHORT (maximum 30 words)
- Only mention 1-2 products with prices
- Be friendly but brief
- Use simple language
- No long explanations
- No styling advice unless asked

Examples of good responses:
"Perfect! Try Women Jeans 30 in orange for ₹883 😊"
"Great choice! Women Hoodie 15 in yellow at ₹1669 - perfect for parties!"
"Sorry, no heels available. Check out Women Top 25 for ₹999 instead!""#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantInput {
    pub user_message: String,
    pub system_instruction: Option<String>,
}

impl AssistantInput {
    /// Wraps a composed prompt with the shopping-assistant instructions.
    pub fn shopping(prompt: impl Into<String>) -> Self {
        Self {
            user_message: prompt.into(),
            system_instruction: Some(SHOPPING_SYSTEM_PROMPT.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantOutput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    MissingApiKey,
    HttpStatus { status: u16, body: String },
    Transport(String),
    Parse(String),
    EmptyResponse,
    Timeout(Duration),
}

impl Display for LlmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing OPENAI_API_KEY"),
            Self::HttpStatus { status, body } => {
                write!(f, "provider request failed with status {status}: {body}")
            }
            Self::Transport(msg) => write!(f, "provider transport error: {msg}"),
            Self::Parse(msg) => write!(f, "provider parse error: {msg}"),
            Self::EmptyResponse => write!(f, "provider returned empty response text"),
            Self::Timeout(limit) => {
                write!(f, "provider did not answer within {}ms", limit.as_millis())
            }
        }
    }
}

impl Error for LlmError {}

pub type LlmResult<T> = std::result::Result<T, LlmError>;

pub trait LlmProvider {
    fn generate(
        &self,
        input: AssistantInput,
    ) -> impl std::future::Future<Output = LlmResult<AssistantOutput>> + Send;
}
