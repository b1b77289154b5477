//! # Vetra Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with retry and timeout support
//! - The OpenAI-backed structured extractor
//! - The Google Calendar writer
//! - Configuration loading (environment variables and TOML files)
//! - Pipeline wiring from loaded configuration
//!
//! ## Architecture
//! - Implements traits defined in `vetra-core`
//! - Depends on `vetra-domain` and `vetra-core`
//! - Contains all "impure" code (I/O, external services)

pub mod bootstrap;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod http;

// Re-export commonly used items
pub use bootstrap::build_pipeline;
pub use calendar::GoogleCalendarClient;
pub use errors::InfraError;
pub use extraction::OpenAiExtractor;
pub use http::HttpClient;
