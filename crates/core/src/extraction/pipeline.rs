//! Extraction orchestration
//!
//! Runs the model-based extractor with a hard timeout, validates its
//! output, and falls back to rule-based extraction when the model is
//! unavailable or produced nothing usable. Once the model yields at least
//! one valid candidate the rule extractor is never consulted, so the two
//! strategies cannot duplicate events.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vetra_domain::constants::MODEL_EXTRACTION_TIMEOUT_SECS;
use vetra_domain::{
    CandidateSource, EventCandidate, EventCategory, EventDescriptor, ReferenceContext,
};

use super::duration::{infer_category, DurationInferencer};
use super::ports::{ExtractionRequest, StructuredExtractor, TimeExpression};
use super::resolver::TimeResolver;
use super::rule_based::RuleBasedExtractor;

/// Outcome of the model-based attempt.
enum ModelOutcome {
    /// At least one valid candidate; rule extraction is skipped.
    Candidates(Vec<EventCandidate>),
    /// The model answered but nothing survived validation.
    NothingUsable,
    /// No model configured, or the call failed or timed out.
    Unavailable,
}

/// Orchestrates extraction strategies and finalizes candidates into
/// descriptors.
pub struct ExtractionPipeline {
    model: Option<Arc<dyn StructuredExtractor>>,
    rule: RuleBasedExtractor,
    resolver: TimeResolver,
    inferencer: DurationInferencer,
    model_timeout: Duration,
}

impl ExtractionPipeline {
    /// Build a rule-only pipeline. Attach a model with [`Self::with_model`].
    pub fn new() -> Self {
        let resolver = TimeResolver::new();
        Self {
            model: None,
            rule: RuleBasedExtractor::new(resolver.clone()),
            resolver,
            inferencer: DurationInferencer::new(),
            model_timeout: Duration::from_secs(MODEL_EXTRACTION_TIMEOUT_SECS),
        }
    }

    /// Attach a model-based extractor; it becomes the preferred strategy.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn StructuredExtractor>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the model call timeout.
    #[must_use]
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Replace the time resolver, e.g. to change its [`super::resolver::SmallHourRule`].
    /// The rule-based extractor is rebuilt on the same resolver so both
    /// paths disambiguate identically.
    #[must_use]
    pub fn with_resolver(mut self, resolver: TimeResolver) -> Self {
        self.rule = RuleBasedExtractor::new(resolver.clone());
        self.resolver = resolver;
        self
    }

    /// Extract validated event descriptors from free-form text.
    ///
    /// Always returns normally; model failures degrade to rule-based
    /// extraction and an empty result means no future-dated event was
    /// found in the text.
    pub async fn extract_events(
        &self,
        text: &str,
        ctx: &ReferenceContext,
    ) -> Vec<EventDescriptor> {
        let candidates = match self.attempt_model(text, ctx).await {
            ModelOutcome::Candidates(candidates) => candidates,
            ModelOutcome::NothingUsable | ModelOutcome::Unavailable => {
                debug!("falling back to rule-based extraction");
                self.rule.extract(text, ctx)
            }
        };

        let events = self.finalize(candidates);
        info!(count = events.len(), "extraction finished");
        events
    }

    async fn attempt_model(&self, text: &str, ctx: &ReferenceContext) -> ModelOutcome {
        let Some(model) = &self.model else {
            return ModelOutcome::Unavailable;
        };

        let request = ExtractionRequest {
            text: text.to_string(),
            reference_date: ctx.reference_date(),
            language_hint: ctx.language_hint.clone(),
        };

        let raw = match tokio::time::timeout(self.model_timeout, model.extract(request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                warn!(%err, "model extraction failed");
                return ModelOutcome::Unavailable;
            }
            Err(_) => {
                warn!(timeout = ?self.model_timeout, "model extraction timed out");
                return ModelOutcome::Unavailable;
            }
        };

        let mut candidates = Vec::new();
        for extraction in raw {
            let label = extraction.label.trim();
            if label.is_empty() {
                debug!("model returned an unlabeled event, skipping");
                continue;
            }

            let start = match &extraction.when {
                // ISO answers are re-anchored into the user's zone so the
                // descriptor offset is always the calendar's, not the
                // service's.
                TimeExpression::Iso(dt) => dt.with_timezone(&ctx.timezone).fixed_offset(),
                TimeExpression::Phrase(phrase) => match self.resolver.resolve(phrase, ctx) {
                    Ok(start) => start,
                    Err(err) => {
                        debug!(phrase, %err, "model phrase did not resolve, skipping");
                        continue;
                    }
                },
            };

            if start <= ctx.reference_instant {
                debug!(label, %start, "model event is in the past, skipping");
                continue;
            }

            let category = match extraction.category_hint.as_deref() {
                Some(hint) => EventCategory::from_hint(hint),
                None => infer_category(label),
            };

            candidates.push(EventCandidate {
                start,
                end: None,
                summary: label.to_string(),
                category,
                source: CandidateSource::Model,
            });
        }

        if candidates.is_empty() {
            ModelOutcome::NothingUsable
        } else {
            ModelOutcome::Candidates(candidates)
        }
    }

    /// Fill in missing end times and convert candidates into descriptors.
    /// Candidate order is preserved.
    fn finalize(&self, candidates: Vec<EventCandidate>) -> Vec<EventDescriptor> {
        candidates
            .into_iter()
            .filter(|candidate| !candidate.summary.trim().is_empty())
            .map(|candidate| {
                let end = candidate
                    .end
                    .filter(|end| *end > candidate.start)
                    .unwrap_or_else(|| {
                        self.inferencer.infer_end(candidate.start, candidate.category)
                    });
                EventDescriptor {
                    start: candidate.start,
                    end,
                    summary: candidate.summary,
                    category: candidate.category,
                }
            })
            .collect()
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
