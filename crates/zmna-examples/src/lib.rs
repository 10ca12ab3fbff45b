use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zmna_core::binding::BindingSnapshot;
use zmna_core::error::ResolutionWarning;
use zmna_core::preverb::resolve_effective_preverb;
use zmna_core::record::VerbRecord;
use zmna_types::Tense;

/// Example sentence provider interface
#[async_trait::async_trait]
pub trait ExampleGenerator: Send + Sync {
    /// Generate example sentences for every preverb in the request
    async fn generate(&self, request: &ExampleRequest) -> Result<ExampleSet, ExampleError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// What a provider needs to know about one requested preverb, with the
/// fallback chains already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPreverb {
    pub requested: String,
    pub effective: String,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub translation: String,
    pub arguments: BindingSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleRequest {
    pub record: VerbRecord,
    pub tense: Tense,
    pub preverbs: Vec<ResolvedPreverb>,
}

impl ExampleRequest {
    /// Build a request for `preverbs` in `tense`. Single-preverb verbs, or an
    /// empty list, ask for the default preverb only.
    pub fn resolve(record: &VerbRecord, tense: Tense, preverbs: &[String]) -> Self {
        let config = &record.preverb_config;
        let rules = &record.preverb_rules;

        let requested: Vec<String> = if !config.has_multiple || preverbs.is_empty() {
            vec![config.default_preverb.clone()]
        } else {
            preverbs.to_vec()
        };

        let preverbs = requested
            .into_iter()
            .map(|requested| {
                let resolution = resolve_effective_preverb(&requested, tense, config, rules);
                // assembled blocks already carry the optative policy
                let translation = record
                    .english_translations
                    .get(&resolution.effective)
                    .or(record.default_translations())
                    .and_then(|block| block.get(&tense))
                    .cloned()
                    .unwrap_or_default();

                ResolvedPreverb {
                    arguments: record.resolved_arguments(&resolution.effective, tense),
                    warning: resolution.warning.as_ref().map(ResolutionWarning::to_string),
                    effective: resolution.effective,
                    used_fallback: resolution.used_fallback,
                    translation,
                    requested,
                }
            })
            .collect();

        Self {
            record: record.clone(),
            tense,
            preverbs,
        }
    }
}

/// Generated examples keyed by requested preverb. Entries are opaque to the
/// editor and stored as returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleSet {
    pub tense: Option<Tense>,
    pub examples: BTreeMap<String, Vec<serde_json::Value>>,
}

impl ExampleSet {
    pub fn for_preverb(&self, preverb: &str) -> &[serde_json::Value] {
        self.examples.get(preverb).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.examples.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    /// Whether requests carry an API key
    pub authenticated: bool,
}

/// Structured error payload returned by example services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub guidance: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExampleError {
    #[error("{kind}: {message}")]
    Service {
        kind: String,
        message: String,
        guidance: Option<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Example generation is disabled")]
    Disabled,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}

impl ExampleError {
    /// What the author can do about it, when the service said
    pub fn guidance(&self) -> Option<&str> {
        match self {
            ExampleError::Service { guidance, .. } => guidance.as_deref(),
            ExampleError::Disabled => Some("Set ZMNA_EXAMPLES_ENABLED=true"),
            ExampleError::RateLimitExceeded => Some("Wait a moment and try again"),
            ExampleError::AuthenticationError => Some("Check ZMNA_EXAMPLES_API_KEY"),
            _ => None,
        }
    }
}

impl From<ServiceErrorBody> for ExampleError {
    fn from(body: ServiceErrorBody) -> Self {
        ExampleError::Service {
            kind: body.kind,
            message: body.message,
            guidance: body.guidance,
        }
    }
}
