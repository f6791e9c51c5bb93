//! Agent module - the reasoning loop at the heart of the service.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Seed a conversation with the system prompt and the user question
//! 2. Call the LLM with the full turn history
//! 3. If the reply requests tools, execute them and append the results
//! 4. Repeat until the model answers in plain text or the ceiling is hit

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError};
pub use prompt::build_system_prompt;
