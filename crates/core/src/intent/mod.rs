//! Request interpretation: source routing, intent extraction and guardrail.
//!
//! Extraction and safety screening are capabilities injected into the
//! pipeline, so tests can swap in deterministic fakes.

mod guardrail;
mod heuristic;
mod llm_extractor;
mod router;
mod types;

pub use guardrail::{Guardrail, GuardrailError, LlmGuardrail, NoopGuardrail, Verdict};
pub use heuristic::HeuristicIntentExtractor;
pub use llm_extractor::{parse_intent, LlmIntentExtractor};
pub use router::route_source;
pub use types::{ReleaseTarget, SourceKind, StructuredIntent};

use async_trait::async_trait;

/// Turns free text into a structured intent for a given source.
///
/// `None` means nothing usable was found (a greeting, an off-topic message,
/// a malformed model reply). That is an expected outcome, not an error.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Name of this extractor for logging.
    fn name(&self) -> &str;

    async fn extract(&self, source: SourceKind, text: &str) -> Option<StructuredIntent>;
}
