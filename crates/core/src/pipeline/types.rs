//! Types for the pipeline module.

use serde::Serialize;
use std::fmt;

use crate::compose::Document;
use crate::intent::{ReleaseTarget, SourceKind, StructuredIntent};
use crate::source::ReleaseMetadata;

/// Reply for requests rejected by the guardrail.
pub const POLICY_VIOLATION_REPLY: &str =
    "Your request violates usage policies. Please modify your input.";

/// Reply when the safety check itself could not run.
pub const GUARDRAIL_UNAVAILABLE_REPLY: &str =
    "Unable to screen your request right now. Please try again later.";

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Guardrail,
    Route,
    ExtractIntent,
    FetchMetadata,
    FetchItems,
    Classify,
    Compose,
    Render,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Guardrail => "guardrail",
            Stage::Route => "route",
            Stage::ExtractIntent => "extract_intent",
            Stage::FetchMetadata => "fetch_metadata",
            Stage::FetchItems => "fetch_items",
            Stage::Classify => "classify",
            Stage::Compose => "compose",
            Stage::Render => "render",
            Stage::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful run.
#[derive(Debug, Clone)]
pub struct GeneratedNotes {
    pub intent: StructuredIntent,
    pub metadata: ReleaseMetadata,
    pub document: Document,
    pub total_items: usize,
    pub pdf_name: String,
}

impl GeneratedNotes {
    pub fn reply(&self) -> String {
        match &self.intent.target {
            ReleaseTarget::Project { key } => format!(
                "Release notes for {} version {} generated successfully.",
                key, self.intent.version
            ),
            ReleaseTarget::Repository { .. } => "GitHub release notes generated.".to_string(),
        }
    }
}

/// How a run ended. Every stage failure is an outcome, never a panic or an
/// error propagated to the caller.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Notes were rendered and persisted.
    Generated(GeneratedNotes),
    /// No intent could be extracted; the user is asked to rephrase.
    Clarification { source: SourceKind },
    /// The guardrail rejected the request.
    PolicyViolation,
    /// A stage failed.
    Failed {
        stage: Stage,
        source: Option<SourceKind>,
        message: String,
    },
}

impl PipelineOutcome {
    /// Metric/log label of this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Generated(_) => "generated",
            PipelineOutcome::Clarification { .. } => "clarification",
            PipelineOutcome::PolicyViolation => "policy_violation",
            PipelineOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, PipelineOutcome::Generated(_))
    }

    pub fn pdf_name(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Generated(notes) => Some(&notes.pdf_name),
            _ => None,
        }
    }

    /// Human-readable reply for the requester.
    pub fn reply(&self) -> String {
        match self {
            PipelineOutcome::Generated(notes) => notes.reply(),
            PipelineOutcome::Clarification { source } => clarification_reply(*source).to_string(),
            PipelineOutcome::PolicyViolation => POLICY_VIOLATION_REPLY.to_string(),
            PipelineOutcome::Failed {
                stage,
                source,
                message,
            } => failure_reply(*stage, *source, message),
        }
    }

    /// Serializable response shape.
    pub fn to_response(&self) -> PipelineResponse {
        let mut response = PipelineResponse {
            reply: self.reply(),
            ..Default::default()
        };

        match self {
            PipelineOutcome::Generated(notes) => {
                match &notes.intent.target {
                    ReleaseTarget::Project { key } => response.project = Some(key.clone()),
                    ReleaseTarget::Repository { owner, repo } => {
                        response.owner = Some(owner.clone());
                        response.repo = Some(repo.clone());
                    }
                }
                response.version = Some(notes.metadata.version.clone());
                response.pdf_name = Some(notes.pdf_name.clone());
            }
            PipelineOutcome::Failed { stage, .. } => response.stage = Some(*stage),
            PipelineOutcome::Clarification { .. } | PipelineOutcome::PolicyViolation => {}
        }

        response
    }
}

/// Wire form of a pipeline outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_name: Option<String>,
    /// Failing stage, for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

pub fn clarification_reply(source: SourceKind) -> &'static str {
    match source {
        SourceKind::IssueTracker => {
            "I can only generate release notes if you provide a JIRA project and version."
        }
        SourceKind::ReleaseHost => {
            "Please provide owner/repo and version. Example: apache/zookeeper 3.9.0"
        }
    }
}

fn failure_reply(stage: Stage, source: Option<SourceKind>, message: &str) -> String {
    match (stage, source) {
        (Stage::Guardrail, _) => GUARDRAIL_UNAVAILABLE_REPLY.to_string(),
        (Stage::FetchMetadata, Some(SourceKind::IssueTracker)) => {
            format!("Error fetching version info: {}", message)
        }
        (Stage::FetchItems, Some(SourceKind::IssueTracker)) => {
            format!("Error fetching issues: {}", message)
        }
        (Stage::FetchMetadata | Stage::FetchItems, _) => {
            format!("Error fetching GitHub release: {}", message)
        }
        (Stage::Classify, Some(SourceKind::IssueTracker)) => {
            format!("Error classifying issues: {}", message)
        }
        (Stage::Classify, _) => format!("Error classifying release: {}", message),
        (Stage::Compose, _) => format!("Error formatting release notes: {}", message),
        (Stage::Render, _) => format!("Error rendering release notes: {}", message),
        (Stage::Persist, _) => format!("Error saving release notes: {}", message),
        (Stage::Route | Stage::ExtractIntent, _) => {
            format!("Error interpreting request: {}", message)
        }
    }
}
