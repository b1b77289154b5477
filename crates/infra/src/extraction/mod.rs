//! OpenAI-backed structured extraction

mod client;
mod types;

pub use client::OpenAiExtractor;
