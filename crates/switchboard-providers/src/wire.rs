//! Wire formats: how each provider wants a conversation and where it puts the reply.
//!
//! Only the fields needed to send a plain text conversation and pull plain
//! text back out are modelled. Everything else in the provider envelopes is
//! ignored on the way in.

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use switchboard_core::types::{ConversationTurn, Role};

use crate::traits::CompletionLimits;

/// Request/response shape spoken by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    /// `POST {base}/chat/completions`, bearer auth.
    OpenAiChat,
    /// `POST {base}/messages`, `x-api-key` auth, system prompt lifted out.
    AnthropicMessages,
    /// `POST {base}/models/{model}:generateContent`, `x-goog-api-key` auth.
    GeminiGenerate,
}

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

impl WireFormat {
    /// Full request URL for this format.
    pub fn endpoint(self, api_base: &str, model: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            WireFormat::OpenAiChat => format!("{}/chat/completions", base),
            WireFormat::AnthropicMessages => format!("{}/messages", base),
            WireFormat::GeminiGenerate => format!("{}/models/{}:generateContent", base, model),
        }
    }

    /// Attach the credential the way this provider expects it.
    pub fn authorize(self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        match self {
            WireFormat::OpenAiChat => request.bearer_auth(api_key),
            WireFormat::AnthropicMessages => request
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            WireFormat::GeminiGenerate => request.header("x-goog-api-key", api_key),
        }
    }

    /// Build the request body for `conversation`.
    pub fn request_body<'a>(
        self,
        model: &'a str,
        conversation: &'a [ConversationTurn],
        limits: &CompletionLimits,
    ) -> WireRequest<'a> {
        match self {
            WireFormat::OpenAiChat => WireRequest::OpenAi(OpenAiRequest {
                model,
                messages: conversation,
                max_tokens: limits.max_tokens,
                temperature: limits.temperature,
            }),
            WireFormat::AnthropicMessages => WireRequest::Anthropic(AnthropicRequest {
                model,
                system: joined_system_prompt(conversation),
                messages: conversation
                    .iter()
                    .filter(|t| t.role != Role::System)
                    .collect(),
                max_tokens: limits.max_tokens,
                temperature: limits.temperature,
            }),
            WireFormat::GeminiGenerate => WireRequest::Gemini(GeminiRequest {
                system_instruction: joined_system_prompt(conversation).map(|text| {
                    GeminiContent {
                        role: None,
                        parts: vec![GeminiPart { text }],
                    }
                }),
                contents: conversation
                    .iter()
                    .filter(|t| t.role != Role::System)
                    .map(|t| GeminiContent {
                        role: Some(if t.role == Role::Assistant { "model" } else { "user" }),
                        parts: vec![GeminiPart {
                            text: t.content.clone(),
                        }],
                    })
                    .collect(),
                generation_config: GeminiGenerationConfig {
                    max_output_tokens: limits.max_tokens,
                    temperature: limits.temperature,
                },
            }),
        }
    }

    /// Pull the reply text out of a success body.
    ///
    /// `Ok(None)` means the body decoded but carried no usable text
    /// (missing, empty, or whitespace only).
    pub fn extract_text(self, body: &str) -> Result<Option<String>, serde_json::Error> {
        let text = match self {
            WireFormat::OpenAiChat => {
                let resp: OpenAiResponse = serde_json::from_str(body)?;
                resp.choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
            }
            WireFormat::AnthropicMessages => {
                let resp: AnthropicResponse = serde_json::from_str(body)?;
                let text: String = resp
                    .content
                    .into_iter()
                    .filter(|block| block.block_type == "text")
                    .filter_map(|block| block.text)
                    .collect();
                Some(text)
            }
            WireFormat::GeminiGenerate => {
                let resp: GeminiResponse = serde_json::from_str(body)?;
                resp.candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content)
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .filter_map(|p| p.text)
                            .collect::<String>()
                    })
            }
        };

        Ok(text.filter(|t| !t.trim().is_empty()))
    }
}

/// All system turns joined by a blank line, or `None` if there are none.
fn joined_system_prompt(conversation: &[ConversationTurn]) -> Option<String> {
    let parts: Vec<&str> = conversation
        .iter()
        .filter(|t| t.role == Role::System)
        .map(|t| t.content.as_str())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

// ─────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────

/// A request body for any supported provider.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WireRequest<'a> {
    OpenAi(OpenAiRequest<'a>),
    Anthropic(AnthropicRequest<'a>),
    Gemini(GeminiRequest),
}

#[derive(Debug, Serialize)]
pub struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationTurn],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct AnthropicRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a ConversationTurn>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

// ─────────────────────────────────────────────
// Response envelopes (only what we read)
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiReplyContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyPart {
    text: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
