use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::compose::ResponseComposer;
use crate::llm::{AssistantInput, LlmError, LlmProvider};
use crate::present::{ProductCard, format_products};
use crate::search::{normalize_query, search};

pub const EMPTY_MESSAGE_REPLY: &str = "Hi! What are you looking for today? 😊";
pub const GREETING_REPLY: &str = "Hello! I can help you find clothes. Try 'women kurti' ! 😊";
pub const NO_MATCH_REPLY: &str = "Sorry, no matches found. Try 'women kurti' !";

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey"];
const GREETING_PHRASES: &[&str] = &["how are you"];
const MAX_REPLY_CHARS: usize = 280;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub products: Vec<ProductCard>,
}

impl ChatReply {
    fn canned(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            products: Vec::new(),
        }
    }
}

/// Runs one chat turn: search, compose, generate, and fall back to a
/// templated reply whenever generation is unavailable or fails.
pub struct ChatService<P> {
    catalog: Arc<Catalog>,
    llm: Option<P>,
    generation_timeout: Duration,
}

impl<P: LlmProvider> ChatService<P> {
    pub fn new(catalog: Arc<Catalog>, llm: Option<P>, generation_timeout: Duration) -> Self {
        Self {
            catalog,
            llm,
            generation_timeout,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn reply(&self, message: &str) -> ChatReply {
        if message.trim().is_empty() {
            return ChatReply::canned(EMPTY_MESSAGE_REPLY);
        }
        if is_greeting(message) {
            return ChatReply::canned(GREETING_REPLY);
        }

        let (prompt, products) = {
            let outcome = search(&self.catalog, message);
            let composition = ResponseComposer::new(&self.catalog).compose(message, &outcome);
            (composition.prompt, format_products(&composition.products))
        };

        let reply = match self.generate(prompt).await {
            Some(text) => text,
            None => fallback_reply(&products),
        };

        ChatReply { reply, products }
    }

    async fn generate(&self, prompt: String) -> Option<String> {
        let llm = self.llm.as_ref()?;
        let result = timeout(self.generation_timeout, llm.generate(AssistantInput::shopping(prompt)))
            .await
            .unwrap_or(Err(LlmError::Timeout(self.generation_timeout)));

        match result {
            Ok(output) => {
                let cleaned = clean_reply(&output.text);
                if cleaned.is_empty() {
                    warn!("assistant reply was empty after cleanup");
                    None
                } else {
                    Some(cleaned)
                }
            }
            Err(err) => {
                warn!(error = %err, "assistant request failed");
                None
            }
        }
    }
}

/// Greeting words must appear as whole words so that "white shirt" is not
/// mistaken for "hi".
pub fn is_greeting(message: &str) -> bool {
    let normalized = normalize_query(message);
    let has_word = normalized
        .split(|ch: char| !ch.is_alphanumeric())
        .any(|word| GREETING_WORDS.contains(&word));
    has_word || GREETING_PHRASES.iter().any(|phrase| normalized.contains(phrase))
}

pub fn fallback_reply(products: &[ProductCard]) -> String {
    match products.first() {
        Some(first) => format!(
            "Found great options! Check out {} for ₹{} 😊",
            first.name, first.price
        ),
        None => {
            info!("no products to mention, using canned reply");
            NO_MATCH_REPLY.to_string()
        }
    }
}

/// Strips markdown emphasis and clips runaway replies at a word boundary.
pub fn clean_reply(text: &str) -> String {
    let stripped = text.replace("**", "").replace('*', "");
    let stripped = stripped.trim();
    if stripped.chars().count() <= MAX_REPLY_CHARS {
        return stripped.to_string();
    }

    let clipped: String = stripped.chars().take(MAX_REPLY_CHARS).collect();
    let clipped = match clipped.rfind(char::is_whitespace) {
        Some(index) => &clipped[..index],
        None => clipped.as_str(),
    };
    format!("{}…", clipped.trim_end())
}
