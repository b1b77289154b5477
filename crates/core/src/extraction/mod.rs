//! Event extraction pipeline
//!
//! Converts free-form chat text plus a [`vetra_domain::ReferenceContext`]
//! into an ordered sequence of validated event descriptors. The pipeline
//! prefers the model-based extractor and falls back to rule-based pattern
//! matching when the service fails, times out, or finds nothing usable.

pub mod duration;
pub mod pipeline;
pub mod ports;
pub mod resolver;
pub mod rule_based;

pub use duration::DurationInferencer;
pub use pipeline::ExtractionPipeline;
pub use ports::StructuredExtractor;
pub use resolver::TimeResolver;
pub use rule_based::RuleBasedExtractor;
