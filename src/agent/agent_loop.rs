//! Core agent loop implementation.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::Config;
use crate::conversation::{Conversation, ToolCall, ToolResult};
use crate::llm::{LlmClient, LlmError};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// Ways a request can fail for good. Tool-level problems never show up
/// here; they are absorbed into the conversation as failed tool results and
/// the model gets a chance to correct itself.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The reasoning backend could not produce a usable reply.
    #[error("reasoning backend unavailable: {0}")]
    ReasoningUnavailable(#[from] LlmError),

    /// The model kept requesting tools past the cycle ceiling.
    #[error("no final answer after {limit} reasoning cycles")]
    IterationLimitExceeded { limit: u32 },
}

/// The travel agent: a reasoning model plus the tool registry, driven in a
/// loop until the model answers in plain text.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    max_iterations: u32,
    tool_timeout: Duration,
    parallel_tools: bool,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, config: &Config) -> Self {
        Self {
            llm,
            tools,
            max_iterations: config.max_iterations,
            tool_timeout: config.tool_timeout,
            parallel_tools: config.parallel_tools,
        }
    }

    /// Answer one user question. Seeds a fresh conversation with the system
    /// prompt and the question, then drives the loop to completion.
    pub async fn answer(&self, question: &str) -> Result<String, AgentError> {
        let mut conversation = Conversation::new(build_system_prompt(&self.tools));
        conversation.push_user(question);
        self.run(&mut conversation).await
    }

    /// Drive an existing conversation until the model replies without tool
    /// calls, the backend fails, or the cycle ceiling is hit.
    ///
    /// Every reasoning call sees the full turn history accumulated so far.
    /// On failure the conversation holds every turn up to the failure point.
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String, AgentError> {
        for cycle in 1..=self.max_iterations {
            tracing::debug!(cycle, turns = conversation.len(), "reasoning cycle");

            let message = self.llm.complete(conversation.turns()).await?;
            conversation.push_assistant(message.clone());

            if !message.has_tool_calls() {
                let answer = message.text.unwrap_or_default();
                tracing::info!(cycles = cycle, turns = conversation.len(), "request complete");
                return Ok(answer);
            }

            tracing::debug!(
                cycle,
                requested = message.tool_calls.len(),
                "dispatching tool calls"
            );
            for result in self.dispatch(&message.tool_calls).await {
                conversation.push_tool_result(result);
            }
        }

        tracing::warn!(limit = self.max_iterations, "iteration ceiling reached");
        Err(AgentError::IterationLimitExceeded {
            limit: self.max_iterations,
        })
    }

    /// Execute one batch of tool calls. Results come back in request order
    /// regardless of dispatch mode.
    async fn dispatch(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        if self.parallel_tools && calls.len() > 1 {
            futures::future::join_all(calls.iter().map(|call| self.invoke_with_timeout(call)))
                .await
        } else {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(self.invoke_with_timeout(call).await);
            }
            results
        }
    }

    /// Invoke one tool under the configured deadline. Registry rejections
    /// (unknown name, bad arguments) and timeouts all become failed results
    /// so the model can see what went wrong.
    async fn invoke_with_timeout(&self, call: &ToolCall) -> ToolResult {
        match tokio::time::timeout(self.tool_timeout, self.tools.invoke(call)).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                tracing::warn!(tool = %call.name, error = %err, "tool call rejected");
                ToolResult::failure(call, err.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    tool = %call.name,
                    timeout = ?self.tool_timeout,
                    "tool call timed out"
                );
                ToolResult::failure(
                    call,
                    format!("tool '{}' timed out after {:?}", call.name, self.tool_timeout),
                )
            }
        }
    }
}
