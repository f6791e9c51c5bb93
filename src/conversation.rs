//! Conversation history threaded through the agent loop.
//!
//! Turns are modeled as an explicit tagged enum rather than raw provider
//! messages so the loop never depends on any particular chat-API wire shape.
//! The wire conversion lives in the LLM client.

use serde_json::Value;

/// A tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Correlation id echoed back in the matching [`ToolResult`].
    pub id: String,
    /// Name of a registered tool.
    pub name: String,
    /// Argument object as emitted by the model. Validated by the registry,
    /// so a non-object here becomes an argument failure, not a crash.
    pub arguments: Value,
}

/// One assistant reply: free text, tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct AssistantMessage {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantMessage {
    /// Reply carrying only free text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Reply carrying only tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            text: None,
            tool_calls: calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Outcome of one executed tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    /// Payload fed back to the model.
    Success(String),
    /// Failure description fed back to the model so it can self-correct.
    Failure(String),
}

impl ToolOutput {
    pub fn is_failure(&self) -> bool {
        matches!(self, ToolOutput::Failure(_))
    }

    /// The text that crosses back into the conversation.
    pub fn as_text(&self) -> String {
        match self {
            ToolOutput::Success(payload) => payload.clone(),
            ToolOutput::Failure(description) => format!("Error: {}", description),
        }
    }
}

/// Result of one dispatched tool call, correlated by call id.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub call_id: String,
    pub name: String,
    pub output: ToolOutput,
}

impl ToolResult {
    pub fn success(call: &ToolCall, payload: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            name: call.name.clone(),
            output: ToolOutput::Success(payload.into()),
        }
    }

    pub fn failure(call: &ToolCall, description: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            name: call.name.clone(),
            output: ToolOutput::Failure(description.into()),
        }
    }
}

/// One entry in a conversation, oldest first.
#[derive(Debug, Clone)]
pub enum Turn {
    /// Fixed system guidance. Always the first turn, set once per request.
    Instruction(String),
    /// Free-text user input.
    User(String),
    /// Model output for one reasoning cycle.
    Assistant(AssistantMessage),
    /// Outcome of one dispatched tool call.
    Tool(ToolResult),
}

/// Append-only turn history for a single request.
///
/// Created with the instruction as its first turn. Turns are only ever
/// appended, never edited in place, and the full history is replayed to the
/// model on every reasoning call. One conversation belongs to exactly one
/// loop invocation and is dropped when the request completes.
#[derive(Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::Instruction(instruction.into())],
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::User(text.into()));
    }

    pub fn push_assistant(&mut self, message: AssistantMessage) {
        self.turns.push(Turn::Assistant(message));
    }

    pub fn push_tool_result(&mut self, result: ToolResult) {
        self.turns.push(Turn::Tool(result));
    }

    /// Full ordered history, instruction first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: json!({}),
        }
    }

    #[test]
    fn instruction_is_always_the_first_turn() {
        let mut conversation = Conversation::new("You plan trips.");
        conversation.push_user("Plan a trip to Goa");
        conversation.push_assistant(AssistantMessage::text("Sure."));

        assert_eq!(conversation.len(), 3);
        match &conversation.turns()[0] {
            Turn::Instruction(text) => assert_eq!(text, "You plan trips."),
            other => panic!("expected instruction first, got {:?}", other),
        }
        // No other instruction turn can appear: the only constructor seeds it
        // and no push method accepts one.
        let instructions = conversation
            .turns()
            .iter()
            .filter(|t| matches!(t, Turn::Instruction(_)))
            .count();
        assert_eq!(instructions, 1);
    }

    #[test]
    fn turns_preserve_append_order() {
        let mut conversation = Conversation::new("sys");
        conversation.push_user("question");
        let request = call("call-1", "get_current_weather");
        conversation.push_assistant(AssistantMessage::tool_calls(vec![request.clone()]));
        conversation.push_tool_result(ToolResult::success(&request, "Sunny, 30°C"));
        conversation.push_assistant(AssistantMessage::text("done"));

        let kinds: Vec<&'static str> = conversation
            .turns()
            .iter()
            .map(|t| match t {
                Turn::Instruction(_) => "instruction",
                Turn::User(_) => "user",
                Turn::Assistant(_) => "assistant",
                Turn::Tool(_) => "tool",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["instruction", "user", "assistant", "tool", "assistant"]
        );
    }

    #[test]
    fn tool_result_correlates_with_its_call() {
        let request = call("call-42", "convert_currency");
        let result = ToolResult::failure(&request, "rate table unavailable");
        assert_eq!(result.call_id, "call-42");
        assert_eq!(result.name, "convert_currency");
        assert!(result.output.is_failure());
        assert_eq!(result.output.as_text(), "Error: rate table unavailable");
    }
}
