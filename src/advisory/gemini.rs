//! Advisory gateway backed by the Gemini `generateContent` endpoint.

use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

use super::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use super::{Advice, AdvisoryError, AdvisoryGateway};
use crate::config::AdvisoryConfig;
use crate::health::HealthMap;
use crate::part::Part;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Blocking HTTP client for the advisory model. Each request is bounded by
/// the configured timeout.
pub struct GeminiAdvisor {
    agent: ureq::Agent,
    config: AdvisoryConfig,
}

impl GeminiAdvisor {
    #[must_use]
    pub fn new(config: AdvisoryConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        Self { agent, config }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt and return the model's text.
    ///
    /// # Errors
    ///
    /// Returns `AdvisoryError` for a missing key, transport failure,
    /// non-success status or an undecodable body.
    pub fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(AdvisoryError::MissingApiKey)?;

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let response = self
            .agent
            .post(&self.url())
            .set("x-goog-api-key", api_key)
            .send_json(body)?;

        let decoded: GenerateContentResponse = response
            .into_json()
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
        Ok(decoded.text())
    }
}

impl AdvisoryGateway for GeminiAdvisor {
    fn advise(&self, parts: &[Part], health: &HealthMap, query: &str) -> Advice {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::advisory_span(parts.len(), query.len()).entered();

        let start = Instant::now();
        let advice = match self.generate(&build_prompt(parts, health, query)) {
            Ok(text) => Advice::from_model(text),
            Err(e) => {
                log::warn!("Advisory request failed: {}", e);
                Advice::fallback()
            }
        };

        let elapsed = start.elapsed();
        log::debug!("Advisory request finished in {:?}", elapsed);
        #[cfg(feature = "metrics")]
        METRICS.record_advisory(elapsed, advice.is_fallback());

        advice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{AdviceSource, APOLOGY};

    #[test]
    fn test_missing_key_falls_back_without_network() {
        let advisor = GeminiAdvisor::new(AdvisoryConfig::default());
        assert!(matches!(advisor.generate("hi"), Err(AdvisoryError::MissingApiKey)));

        let advice = advisor.advise(&[], &HealthMap::new(), "hi");
        assert_eq!(advice.text, APOLOGY);
        assert_eq!(advice.source, AdviceSource::Fallback);
    }

    #[test]
    fn test_unreachable_endpoint_falls_back() {
        let advisor = GeminiAdvisor::new(AdvisoryConfig {
            api_key: Some("test".to_string()),
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..AdvisoryConfig::default()
        });
        let advice = advisor.advise(&[], &HealthMap::new(), "hi");
        assert!(advice.is_fallback());
    }

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let advisor = GeminiAdvisor::new(AdvisoryConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            ..AdvisoryConfig::default()
        });
        assert_eq!(
            advisor.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let decoded: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Replace " }, { "text": "the filter." }] } }]
        }))
        .unwrap();
        assert_eq!(decoded.text(), "Replace the filter.");

        let decoded: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(decoded.text(), "");
    }
}
