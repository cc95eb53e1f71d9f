//! AgentDesk Provider - agent dispatch over pluggable LLM backends
//!
//! A request picks one of four agent modes, gets the matching instruction
//! template, and is sent to the configured backend in a single call. Any
//! JSON object in the reply is recovered into `structured`.

pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod openai;
pub mod templates;

pub use backend::{backend_for, is_placeholder_key, GenerationConfig, TextBackend};
pub use dispatcher::{compose_prompt, AgentDispatcher};
pub use error::{AgentError, Result};
pub use extract::extract_json_object;
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
