//! Mistral AI client for muselink
//!
//! This crate provides a chat-completions client with function/tool-call
//! support, used by the chat client to drive the muselink API.
//!
//! # Example
//!
//! ```rust,no_run
//! use muselink_mistral_client::{ChatMessage, MistralClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MistralClient::from_env()?;
//! let reply = client.chat(vec![ChatMessage::user("Recommend a song")]).await?;
//! println!("{}", reply.content_or_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `MISTRAL_API_KEY`: API key for the Mistral platform (required)
//! - `MISTRAL_MODEL`: chat model (default voxtral-small-2507)

mod client;
mod error;
mod models;

pub use client::MistralClient;
pub use error::{MistralError, MistralResult};
pub use models::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatRole, FunctionCall, Tool, ToolCall,
    ToolChoice, ToolChoiceFunction, ToolFunction,
};
