//! # Wayfarer
//!
//! A travel-planning agent service: one HTTP endpoint in, one Markdown
//! travel plan out.
//!
//! This library provides:
//! - An HTTP API for submitting travel questions
//! - A tool-calling agent loop over weather, place search, currency, and
//!   expense tools
//! - An OpenAI-compatible reasoning client (OpenAI and Groq)
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a question via the API
//! 2. Seed a conversation with the system prompt and the question
//! 3. Call the LLM, append its reply, execute any requested tools
//! 4. Feed tool results back and repeat until the model answers in text
//!
//! ## Example
//!
//! ```rust,ignore
//! use wayfarer::{api, config::Config};
//!
//! let config = Config::load()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod tools;

pub use config::Config;
