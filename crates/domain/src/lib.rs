//! # Vetra Domain
//!
//! Business domain types and models for the Vetra event extraction pipeline.
//!
//! This crate contains:
//! - Domain data types (EventCandidate, EventDescriptor, ReferenceContext)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and timezone utilities
//!
//! ## Architecture
//! - No dependencies on other Vetra crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::PipelineConfig;
pub use errors::*;
pub use types::*;
// Re-export timezone utilities
pub use utils::timezone::{resolve_timezone_alias, validate_timezone};
