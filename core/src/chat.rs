// core/src/chat.rs

//! Relay between the storefront chat widget and a generative-language model.
//!
//! The relay holds no state: each request carries its own history and the caller's API key,
//! which is used for that one upstream call and never stored.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::error::{Result, ZibenError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const SYSTEM_PROMPT: &str = "\
You are the customer-support assistant of ZIBEN, a Korean brand of premium workwear and safety shoes.
Answer in the customer's language (Korean by default), politely and precisely.

You help with:
- Questions about ZIBEN workwear and safety shoes, and product recommendations.
- Quotes and bulk (B2B) orders: point customers to the quote request form.
- General customer questions about orders and delivery.

Product lines:
- Workwear: all-season, winter insulated, waterproof, flame-retardant, anti-static, high-visibility.
- Safety shoes: standard toe-cap, electrically insulated, waterproof, lightweight, anti-static, heat-resistant for welding.

The brand stands for safety and style together, premium quality, and B2B volume supply.
Keep answers concrete and use emoji sparingly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
  User,
  Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String,
  pub content: String,
}

impl ChatMessage {
  /// Anything other than `user` is treated as a model turn.
  pub fn upstream_role(&self) -> ChatRole {
    if self.role == "user" {
      ChatRole::User
    } else {
      ChatRole::Model
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
  #[serde(default)]
  pub messages: Vec<ChatMessage>,
  pub api_key: Option<String>,
  pub model: Option<String>,
}

/// One upstream call: prior turns as history, the last message as the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
  pub api_key: String,
  pub model: String,
  pub system_prompt: String,
  pub history: Vec<(ChatRole, String)>,
  pub prompt: String,
}

/// Streaming text generation. Errors before the first chunk (bad key, quota) must be
/// returned from `stream_reply` itself so they can become a proper HTTP status.
#[async_trait]
pub trait ChatModel: Send + Sync {
  async fn stream_reply(&self, turn: ChatTurn) -> Result<BoxStream<'static, Result<String>>>;
}

pub struct ChatRelay {
  model: Arc<dyn ChatModel>,
}

impl ChatRelay {
  pub fn new(model: Arc<dyn ChatModel>) -> Self {
    Self { model }
  }

  /// Opens the upstream stream and returns it framed for the widget, one encoded line per chunk.
  #[instrument(name = "chat::relay", skip(self, request), fields(messages = request.messages.len()), err(Display))]
  pub async fn relay(&self, request: ChatRequest) -> Result<BoxStream<'static, Result<String>>> {
    let turn = build_turn(request)?;
    let upstream = self.model.stream_reply(turn).await?;

    Ok(
      upstream
        .map(|chunk| match chunk {
          Ok(text) => Ok(encode_chunk(&text)),
          Err(e) => {
            error!(error = %e, "Chat stream failed mid-response.");
            Err(e)
          }
        })
        .boxed(),
    )
  }
}

pub fn build_turn(request: ChatRequest) -> Result<ChatTurn> {
  let api_key = request
    .api_key
    .map(|k| k.trim().to_string())
    .filter(|k| !k.is_empty())
    .ok_or_else(|| ZibenError::Validation("An API key is required to use the chat assistant.".to_string()))?;

  let mut messages = request.messages;
  let last = messages
    .pop()
    .ok_or_else(|| ZibenError::Validation("At least one message is required.".to_string()))?;

  let model = request
    .model
    .map(|m| m.trim().to_string())
    .filter(|m| !m.is_empty())
    .unwrap_or_else(|| DEFAULT_MODEL.to_string());
  if !is_model_name(&model) {
    return Err(ZibenError::Validation(format!("Unsupported model name '{}'.", model)));
  }

  Ok(ChatTurn {
    api_key,
    model,
    system_prompt: SYSTEM_PROMPT.to_string(),
    history: messages.into_iter().map(|m| (m.upstream_role(), m.content)).collect(),
    prompt: last.content,
  })
}

/// Frames one text chunk as `0:<json string>\n`.
/// Model names go into the upstream URL path, so only `[A-Za-z0-9._-]` is accepted.
fn is_model_name(model: &str) -> bool {
  model
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    && model.chars().any(|c| c.is_ascii_alphanumeric())
}

pub fn encode_chunk(text: &str) -> String {
  let quoted = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
  format!("0:{}\n", quoted)
}
