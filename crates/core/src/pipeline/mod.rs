//! Release notes pipeline orchestration.
//!
//! A run is linear with early exit:
//! guardrail, route, extract intent, fetch metadata, fetch items, classify,
//! compose, render, persist. Nothing is retried here and nothing is rolled
//! back; an artifact is only persisted once it is fully rendered.

mod types;

pub use types::{
    clarification_reply, GeneratedNotes, PipelineOutcome, PipelineResponse, Stage,
    GUARDRAIL_UNAVAILABLE_REPLY, POLICY_VIOLATION_REPLY,
};

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::classify::classify;
use crate::compose::compose;
use crate::intent::{
    route_source, Guardrail, IntentExtractor, NoopGuardrail, SourceKind, StructuredIntent,
};
use crate::metrics::{DOCUMENT_ITEMS, PIPELINE_RUNS, STAGE_DURATION};
use crate::render::{render_document, RenderBackend};
use crate::source::SourceAdapter;
use crate::store::{artifact_filename, Artifact, ArtifactStore};

/// Sequences the pipeline stages over injected capabilities.
pub struct ReleaseNotesPipeline {
    guardrail: Arc<dyn Guardrail>,
    extractor: Arc<dyn IntentExtractor>,
    adapters: HashMap<SourceKind, Arc<dyn SourceAdapter>>,
    renderer: Arc<dyn RenderBackend>,
    store: Arc<dyn ArtifactStore>,
}

impl ReleaseNotesPipeline {
    /// Create a pipeline with no guardrail and no source adapters.
    pub fn new(
        extractor: Arc<dyn IntentExtractor>,
        renderer: Arc<dyn RenderBackend>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            guardrail: Arc::new(NoopGuardrail),
            extractor,
            adapters: HashMap::new(),
            renderer,
            store,
        }
    }

    pub fn with_guardrail(mut self, guardrail: Arc<dyn Guardrail>) -> Self {
        self.guardrail = guardrail;
        self
    }

    /// Register an adapter for the source it answers for. A later adapter
    /// for the same source replaces the earlier one.
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Handle one free-text request end to end.
    pub async fn run(&self, text: &str) -> PipelineOutcome {
        let outcome = self.run_stages(text).await;
        self.record(&outcome, None);
        outcome
    }

    /// Generate notes for an already structured intent, skipping the
    /// guardrail, routing and extraction.
    pub async fn generate(&self, intent: StructuredIntent) -> PipelineOutcome {
        let source = intent.source();
        let outcome = self.generate_from(intent).await;
        self.record(&outcome, Some(source));
        outcome
    }

    async fn run_stages(&self, text: &str) -> PipelineOutcome {
        let verdict = timed(Stage::Guardrail, self.guardrail.check(text)).await;
        match verdict {
            Ok(v) if v.is_safe() => {}
            Ok(_) => {
                warn!(guardrail = self.guardrail.name(), "Request rejected by guardrail");
                return PipelineOutcome::PolicyViolation;
            }
            Err(e) => {
                error!(guardrail = self.guardrail.name(), error = %e, "Guardrail unavailable");
                return PipelineOutcome::Failed {
                    stage: Stage::Guardrail,
                    source: None,
                    message: e.to_string(),
                };
            }
        }

        let source = timed(Stage::Route, async { route_source(text) }).await;
        info!(%source, "Routed request");

        let extracted = timed(Stage::ExtractIntent, self.extractor.extract(source, text)).await;
        let intent = match extracted {
            Some(intent) if intent.source() == source => intent,
            Some(intent) => {
                warn!(
                    extractor = self.extractor.name(),
                    %source,
                    release = %intent.target,
                    "Extractor returned an intent for the wrong source"
                );
                return PipelineOutcome::Clarification { source };
            }
            None => {
                info!(extractor = self.extractor.name(), %source, "No intent extracted");
                return PipelineOutcome::Clarification { source };
            }
        };

        self.generate_from(intent).await
    }

    async fn generate_from(&self, intent: StructuredIntent) -> PipelineOutcome {
        let source = intent.source();
        info!(
            %source,
            release = %intent.target,
            version = %intent.version,
            "Generating release notes"
        );

        let fail = |stage: Stage, message: String| PipelineOutcome::Failed {
            stage,
            source: Some(source),
            message,
        };

        let Some(adapter) = self.adapters.get(&source) else {
            return fail(
                Stage::FetchMetadata,
                format!("no adapter configured for {}", source),
            );
        };

        let metadata = match timed(Stage::FetchMetadata, adapter.fetch_metadata(&intent)).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(%source, error = %e, "Metadata fetch failed");
                return fail(Stage::FetchMetadata, e.to_string());
            }
        };
        if !metadata.has_known_date() {
            info!(%source, version = %metadata.version, "Release date unknown");
        }

        let items = match timed(Stage::FetchItems, adapter.fetch_items(&intent, &metadata)).await {
            Ok(items) => items,
            Err(e) => {
                warn!(%source, error = %e, "Item fetch failed");
                return fail(Stage::FetchItems, e.to_string());
            }
        };

        let categorized =
            match timed(Stage::Classify, async { classify(metadata.clone(), items) }).await {
                Ok(categorized) => categorized,
                Err(e) => {
                    warn!(%source, error = %e, "Classification failed");
                    return fail(Stage::Classify, e.to_string());
                }
            };
        let total_items = categorized.total_items();
        DOCUMENT_ITEMS
            .with_label_values(&[source.as_str()])
            .observe(total_items as f64);

        let document = timed(Stage::Compose, async { compose(&categorized) }).await;

        let renderer = Arc::clone(&self.renderer);
        let to_render = document.clone();
        let rendered = timed(Stage::Render, async move {
            tokio::task::spawn_blocking(move || render_document(&to_render, renderer.as_ref()))
                .await
        })
        .await;
        let bytes = match rendered {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                warn!(%source, error = %e, "Render failed");
                return fail(Stage::Render, e.to_string());
            }
            Err(e) => {
                error!(%source, error = %e, "Render task failed");
                return fail(Stage::Render, e.to_string());
            }
        };

        let pdf_name = artifact_filename(&intent.target, &metadata.version);
        let artifact = Artifact::new(pdf_name.clone(), bytes);
        if let Err(e) = timed(Stage::Persist, self.store.put(&artifact)).await {
            error!(store = self.store.name(), artifact = %pdf_name, error = %e, "Persist failed");
            return fail(Stage::Persist, e.to_string());
        }

        info!(
            %source,
            artifact = %pdf_name,
            items = total_items,
            bytes = artifact.bytes.len(),
            "Release notes generated"
        );

        PipelineOutcome::Generated(GeneratedNotes {
            intent,
            metadata,
            document,
            total_items,
            pdf_name,
        })
    }

    fn record(&self, outcome: &PipelineOutcome, source: Option<SourceKind>) {
        let source = match outcome {
            PipelineOutcome::Generated(notes) => Some(notes.intent.source()),
            PipelineOutcome::Clarification { source } => Some(*source),
            PipelineOutcome::Failed { source, .. } => *source,
            PipelineOutcome::PolicyViolation => None,
        }
        .or(source);

        PIPELINE_RUNS
            .with_label_values(&[source.map(|s| s.as_str()).unwrap_or("unknown"), outcome.label()])
            .inc();
    }
}

/// Await a stage and record its duration.
async fn timed<F: Future>(stage: Stage, fut: F) -> F::Output {
    let start = Instant::now();
    let output = fut.await;
    STAGE_DURATION
        .with_label_values(&[stage.as_str()])
        .observe(start.elapsed().as_secs_f64());
    output
}
