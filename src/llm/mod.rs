//! LLM completion calls (Ollama, OpenAI-compatible, Anthropic).

pub mod completion;

pub use completion::{analysis_prompt, complete, summary_prompt};
