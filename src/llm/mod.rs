//! Document analysis via an OpenAI-compatible chat-completion API.
//!
//! The client sends one system instruction (chosen from [`presets`]) and one
//! user message containing the caller's prompt followed by the extracted text.

mod client;
mod config;
pub mod presets;

pub use client::{build_messages, AnalysisClient, AnalysisError, ChatMessage};
pub use config::AnalysisConfig;
pub use presets::{Preset, GENERIC_INSTRUCTION, PRESETS};
