use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use zmna_config::examples::ExamplesConfig;
use zmna_examples::{
    ExampleError, ExampleGenerator, ExampleRequest, ExampleSet, ProviderMetadata, ServiceErrorBody,
};
use zmna_types::Tense;

/// Example generator backed by an HTTP service that takes the request as
/// JSON and answers with `{"examples": {preverb: [...]}}` or
/// `{"error": {"type", "message", "guidance"}}`.
#[derive(Clone)]
pub struct HttpExampleGenerator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl HttpExampleGenerator {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {e}");
                reqwest::Client::new()
            });

        Self {
            client,
            api_key,
            api_url,
        }
    }

    pub fn from_config(config: &ExamplesConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.api_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl ExampleGenerator for HttpExampleGenerator {
    async fn generate(&self, request: &ExampleRequest) -> Result<ExampleSet, ExampleError> {
        tracing::debug!(
            "Requesting {} examples for {} preverb(s) of {}",
            request.tense,
            request.preverbs.len(),
            request.record.key()
        );

        let mut builder = self.client.post(&self.api_url).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == 429 {
            return Err(ExampleError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(ExampleError::AuthenticationError);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(json) => service_error(&json)
                    .unwrap_or_else(|| ExampleError::InvalidResponse(format!("HTTP {status}"))),
                Err(_) => ExampleError::InvalidResponse(format!("HTTP {status}")),
            });
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ExampleError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let set = parse_examples(request.tense, &json)?;
        tracing::info!("Received {} examples for {}", set.total(), request.record.key());
        Ok(set)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "HTTP example service".to_string(),
            authenticated: !self.api_key.is_empty(),
        }
    }
}

fn service_error(json: &serde_json::Value) -> Option<ExampleError> {
    let body: ServiceErrorBody = serde_json::from_value(json.get("error")?.clone()).ok()?;
    Some(body.into())
}

fn parse_examples(tense: Tense, json: &serde_json::Value) -> Result<ExampleSet, ExampleError> {
    if let Some(err) = service_error(json) {
        return Err(err);
    }

    let examples = json
        .get("examples")
        .and_then(|e| e.as_object())
        .ok_or_else(|| ExampleError::InvalidResponse("No examples in response".to_string()))?;

    let mut by_preverb = BTreeMap::new();
    for (preverb, list) in examples {
        let list = list.as_array().ok_or_else(|| {
            ExampleError::InvalidResponse(format!("Examples for {preverb:?} are not a list"))
        })?;
        by_preverb.insert(preverb.clone(), list.clone());
    }

    Ok(ExampleSet {
        tense: Some(tense),
        examples: by_preverb,
    })
}
