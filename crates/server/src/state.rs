use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use relnotes_core::{
    ArtifactStore, Config, FsArtifactStore, Guardrail, HeuristicIntentExtractor, IntentExtractor,
    IntentMode, IssueTrackerClient, LlmClient, LlmGuardrail, LlmIntentExtractor, NoopGuardrail,
    OpenAiCompatibleClient, PdfBackend, ReleaseHostClient, ReleaseNotesPipeline, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: ReleaseNotesPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: ReleaseNotesPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Build the production pipeline described by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let pipeline = build_pipeline(&config)?;
        Ok(Self::new(config, pipeline))
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &ReleaseNotesPipeline {
        &self.pipeline
    }

    /// Store holding generated documents.
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        self.pipeline.store()
    }
}

fn build_pipeline(config: &Config) -> Result<ReleaseNotesPipeline> {
    let extractor: Arc<dyn IntentExtractor> = match config.intent.mode {
        IntentMode::Heuristic => {
            info!("Using heuristic intent extraction");
            Arc::new(HeuristicIntentExtractor::new())
        }
        IntentMode::Llm => {
            let llm = config
                .llm
                .as_ref()
                .context("intent.mode = \"llm\" requires an [llm] section")?;
            let client: Arc<dyn LlmClient> = Arc::new(
                OpenAiCompatibleClient::from_config(llm, None)
                    .context("Failed to create LLM client")?,
            );
            info!(
                provider = client.provider(),
                model = client.model(),
                "Using LLM intent extraction"
            );
            Arc::new(LlmIntentExtractor::new(client).with_max_tokens(llm.max_tokens))
        }
    };

    let guardrail: Arc<dyn Guardrail> = if config.guardrail.enabled {
        let llm = config
            .llm
            .as_ref()
            .context("guardrail.enabled requires an [llm] section")?;
        let client = OpenAiCompatibleClient::from_config(llm, config.guardrail.model.as_deref())
            .context("Failed to create guardrail LLM client")?;
        info!(model = client.model(), "Guardrail enabled");
        Arc::new(LlmGuardrail::new(Arc::new(client)))
    } else {
        info!("Guardrail disabled");
        Arc::new(NoopGuardrail)
    };

    let issue_tracker = IssueTrackerClient::new(&config.issue_tracker)
        .context("Failed to create issue tracker client")?;
    let release_host = ReleaseHostClient::new(&config.release_host)
        .context("Failed to create release host client")?;
    info!(
        issue_tracker = %config.issue_tracker.base_url,
        release_host = %config.release_host.base_url,
        "Source adapters initialized"
    );

    let store = FsArtifactStore::new(config.storage.output_dir.clone());
    info!("Documents stored under {:?}", config.storage.output_dir);

    Ok(ReleaseNotesPipeline::new(extractor, Arc::new(PdfBackend::default()), Arc::new(store))
        .with_guardrail(guardrail)
        .with_adapter(Arc::new(issue_tracker))
        .with_adapter(Arc::new(release_host)))
}
