pub mod classify;
pub mod compose;
pub mod config;
pub mod intent;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod store;
pub mod testing;

pub use classify::{
    classify, classify_issues, classify_release_notes, clean_line, infer_category,
    CategorizedResult, Category, ClassificationError, ReleaseCategory,
};
pub use compose::{compose, Document};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, IntentMode,
    LlmConfig, SanitizedConfig,
};
pub use intent::{
    route_source, Guardrail, GuardrailError, HeuristicIntentExtractor, IntentExtractor,
    LlmGuardrail, LlmIntentExtractor, NoopGuardrail, ReleaseTarget, SourceKind,
    StructuredIntent, Verdict,
};
pub use llm::{LlmClient, LlmError, OpenAiCompatibleClient};
pub use pipeline::{PipelineOutcome, PipelineResponse, ReleaseNotesPipeline, Stage};
pub use render::{render_document, PdfBackend, RenderBackend, RenderError};
pub use source::{
    FetchError, IssueTrackerClient, NormalizedItem, RawRelease, ReleaseHostClient,
    ReleaseMetadata, SourceAdapter, SourceItems,
};
pub use store::{artifact_filename, Artifact, ArtifactStore, FsArtifactStore, StoreError};
