// storefront/src/services/gemini.rs

//! Gemini `streamGenerateContent` client.

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use ziben::chat::ChatRole;
use ziben::{ChatModel, ChatTurn, Result, ZibenError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
  system_instruction: Content<'a>,
  contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<&'static str>,
  parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GenerateChunk {
  candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
  parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidatePart {
  text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct UpstreamErrorBody {
  error: UpstreamErrorDetail,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct UpstreamErrorDetail {
  message: String,
}

fn role_name(role: ChatRole) -> &'static str {
  match role {
    ChatRole::User => "user",
    ChatRole::Model => "model",
  }
}

fn request_body(turn: &ChatTurn) -> GenerateRequest<'_> {
  let mut contents: Vec<Content<'_>> = turn
    .history
    .iter()
    .map(|(role, text)| Content {
      role: Some(role_name(*role)),
      parts: vec![Part { text }],
    })
    .collect();
  contents.push(Content {
    role: Some("user"),
    parts: vec![Part { text: &turn.prompt }],
  });
  GenerateRequest {
    system_instruction: Content {
      role: None,
      parts: vec![Part {
        text: &turn.system_prompt,
      }],
    },
    contents,
  }
}

/// Incremental decoder for the `alt=sse` response body.
///
/// Network chunks can split lines and multi-byte characters, so bytes are buffered until a
/// full line is available.
#[derive(Debug, Default)]
pub struct SseTextDecoder {
  buffer: Vec<u8>,
}

impl SseTextDecoder {
  /// Feeds bytes and returns the text of every complete `data:` event seen so far.
  pub fn push(&mut self, bytes: &[u8]) -> Result<String> {
    self.buffer.extend_from_slice(bytes);
    let mut text = String::new();
    while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
      let line: Vec<u8> = self.buffer.drain(..=pos).collect();
      text.push_str(&decode_line(&line)?);
    }
    Ok(text)
  }

  /// Flushes a trailing line that had no newline.
  pub fn finish(&mut self) -> Result<String> {
    let rest = std::mem::take(&mut self.buffer);
    decode_line(&rest)
  }
}

fn decode_line(line: &[u8]) -> Result<String> {
  let line = std::str::from_utf8(line)
    .map_err(|e| ZibenError::Upstream {
      status: 502,
      message: format!("Invalid UTF-8 in model stream: {}", e),
    })?
    .trim();

  let Some(data) = line.strip_prefix("data:") else {
    return Ok(String::new());
  };
  let data = data.trim();
  if data.is_empty() || data == "[DONE]" {
    return Ok(String::new());
  }

  let chunk: GenerateChunk = serde_json::from_str(data).map_err(|e| ZibenError::Upstream {
    status: 502,
    message: format!("Unreadable model stream event: {}", e),
  })?;
  Ok(
    chunk
      .candidates
      .into_iter()
      .filter_map(|c| c.content)
      .flat_map(|c| c.parts)
      .filter_map(|p| p.text)
      .collect(),
  )
}

#[derive(Clone)]
pub struct GeminiClient {
  http: Client,
  api_base: String,
}

impl GeminiClient {
  pub fn new(http: Client, api_base: impl Into<String>) -> Self {
    Self {
      http,
      api_base: api_base.into(),
    }
  }

  fn stream_url(&self, model: &str) -> String {
    format!(
      "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
      self.api_base.trim_end_matches('/'),
      model
    )
  }
}

#[async_trait]
impl ChatModel for GeminiClient {
  #[instrument(name = "gemini::stream_reply", skip(self, turn), fields(model = %turn.model, history = turn.history.len()), err(Display))]
  async fn stream_reply(&self, turn: ChatTurn) -> Result<BoxStream<'static, Result<String>>> {
    let body = request_body(&turn);

    let response = self
      .http
      .post(self.stream_url(&turn.model))
      .header("x-goog-api-key", &turn.api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| {
        error!(error = %e, "Gemini request failed.");
        ZibenError::Upstream {
          status: 502,
          message: "The chat service could not be reached.".to_string(),
        }
      })?;

    let status = response.status();
    if !status.is_success() {
      let detail = response
        .json::<UpstreamErrorBody>()
        .await
        .map(|b| b.error.message)
        .unwrap_or_default();
      warn!(status = status.as_u16(), detail = %detail, "Gemini rejected the request.");
      if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ZibenError::UpstreamQuota(detail));
      }
      let message = if detail.is_empty() {
        format!("The chat service answered with status {}.", status.as_u16())
      } else {
        detail
      };
      return Err(ZibenError::Upstream {
        status: status.as_u16(),
        message,
      });
    }
    debug!("Gemini stream opened.");

    let body = response.bytes_stream().boxed();
    let chunks = stream::unfold(
      (body, SseTextDecoder::default(), false),
      |(mut body, mut decoder, done)| async move {
        if done {
          return None;
        }
        loop {
          match body.next().await {
            Some(Ok(bytes)) => match decoder.push(&bytes) {
              Ok(text) if text.is_empty() => continue,
              Ok(text) => return Some((Ok(text), (body, decoder, false))),
              Err(e) => return Some((Err(e), (body, decoder, true))),
            },
            Some(Err(e)) => {
              let err = ZibenError::Upstream {
                status: 502,
                message: format!("Chat stream interrupted: {}", e),
              };
              return Some((Err(err), (body, decoder, true)));
            }
            None => {
              return match decoder.finish() {
                Ok(text) if text.is_empty() => None,
                other => Some((other, (body, decoder, true))),
              };
            }
          }
        }
      },
    );

    Ok(chunks.boxed())
  }
}
