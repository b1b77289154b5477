//! # Vetra Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The extraction pipeline (time resolution, rule-based extraction,
//!   duration inference, orchestration)
//! - Port/adapter interfaces (traits) for the structured-extraction
//!   service and calendar persistence
//!
//! ## Architecture Principles
//! - Only depends on `vetra-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod extraction;

// Infrastructure ports
pub mod calendar_ports;

// Re-export specific items to avoid ambiguity
pub use calendar_ports::CalendarWriter;
pub use extraction::duration::{infer_category, DurationInferencer};
pub use extraction::pipeline::ExtractionPipeline;
pub use extraction::ports::{
    ExtractionError, ExtractionRequest, RawExtraction, StructuredExtractor, TimeExpression,
};
pub use extraction::resolver::{ResolutionError, SmallHourRule, TimeResolver};
pub use extraction::rule_based::RuleBasedExtractor;
