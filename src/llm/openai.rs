//! OpenAI-compatible chat completions client with tool calling.
//!
//! Groq exposes the same protocol, so provider selection is just a base URL
//! and an API key. Tool descriptors are converted to the provider's function
//! schema once at construction and attached to every request.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use async_trait::async_trait;

use super::{LlmClient, LlmError};
use crate::conversation::{AssistantMessage, ToolCall, Turn};
use crate::tools::ToolDescriptor;

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    /// Prebuilt `tools` array, absent when no tools are registered.
    tools: Option<Value>,
}

impl OpenAiClient {
    pub fn new(
        http: reqwest::Client,
        api_key: String,
        base_url: &str,
        model: String,
        descriptors: &[ToolDescriptor],
    ) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            tools: tools_payload(descriptors),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded argument object, as the protocol defines it.
    arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

/// Map the turn history onto provider roles. The instruction becomes the
/// system message, tool results reference their call id.
fn wire_messages(turns: &[Turn]) -> Vec<WireMessage> {
    turns
        .iter()
        .map(|turn| match turn {
            Turn::Instruction(text) => WireMessage {
                role: "system",
                content: Some(text.clone()),
                tool_calls: None,
                tool_call_id: None,
            },
            Turn::User(text) => WireMessage {
                role: "user",
                content: Some(text.clone()),
                tool_calls: None,
                tool_call_id: None,
            },
            Turn::Assistant(message) => WireMessage {
                role: "assistant",
                content: message.text.clone(),
                tool_calls: if message.tool_calls.is_empty() {
                    None
                } else {
                    Some(message.tool_calls.iter().map(wire_tool_call).collect())
                },
                tool_call_id: None,
            },
            Turn::Tool(result) => WireMessage {
                role: "tool",
                content: Some(result.output.as_text()),
                tool_calls: None,
                tool_call_id: Some(result.call_id.clone()),
            },
        })
        .collect()
}

fn wire_tool_call(call: &ToolCall) -> WireToolCall {
    WireToolCall {
        id: call.id.clone(),
        kind: function_kind(),
        function: WireFunction {
            name: call.name.clone(),
            arguments: call.arguments.to_string(),
        },
    }
}

/// Convert registered descriptors into the provider's function schema.
fn tools_payload(descriptors: &[ToolDescriptor]) -> Option<Value> {
    if descriptors.is_empty() {
        return None;
    }
    let tools: Vec<Value> = descriptors
        .iter()
        .map(|descriptor| {
            let mut properties = serde_json::Map::new();
            let mut required = Vec::new();
            for arg in &descriptor.args {
                properties.insert(
                    arg.name.to_string(),
                    json!({
                        "type": arg.ty.json_type(),
                        "description": arg.description,
                    }),
                );
                if arg.required {
                    required.push(Value::String(arg.name.to_string()));
                }
            }
            json!({
                "type": "function",
                "function": {
                    "name": descriptor.name,
                    "description": descriptor.description,
                    "parameters": {
                        "type": "object",
                        "properties": properties,
                        "required": required,
                    },
                },
            })
        })
        .collect();
    Some(Value::Array(tools))
}

/// Pull the assistant message out of a parsed response. Argument strings
/// that fail to parse become `Null` and are left for registry validation to
/// report back to the model.
fn assistant_from_response(response: ChatResponse) -> Result<AssistantMessage, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

    let mut tool_calls = Vec::new();
    for wire in choice.message.tool_calls.unwrap_or_default() {
        let id = if wire.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            wire.id
        };
        let arguments = serde_json::from_str(&wire.function.arguments).unwrap_or(Value::Null);
        tool_calls.push(ToolCall {
            id,
            name: wire.function.name,
            arguments,
        });
    }

    Ok(AssistantMessage {
        text: choice.message.content.filter(|text| !text.is_empty()),
        tool_calls,
    })
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(600) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, turns: &[Turn]) -> Result<AssistantMessage, LlmError> {
        let messages = wire_messages(turns);
        let request = ChatRequest {
            model: &self.model,
            messages: &messages,
            tools: self.tools.as_ref(),
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.model, turns = turns.len(), "requesting completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Auth(body),
                code => LlmError::Api {
                    status: code,
                    message: body,
                },
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidResponse(format!("{}: {}", e, truncate_body(&body))))?;
        assistant_from_response(parsed)
    }
}
