use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::citations::GroundingCitation;
use crate::config::Config;
use crate::error::{Error, Result};

/// Text answer plus the web references it was grounded on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub citations: Vec<GroundingCitation>,
}

// ---------------------------------------------------------------------------
// Client abstraction (for testability)
// ---------------------------------------------------------------------------

pub trait GenerationClient {
    /// Send one instruction, allowing the service to search the web before
    /// answering.
    fn generate(&self, prompt: &str) -> Result<Generation>;
}

impl<C: GenerationClient + ?Sized> GenerationClient for Arc<C> {
    fn generate(&self, prompt: &str) -> Result<Generation> {
        (**self).generate(prompt)
    }
}

/// Resolve the API key from the configured environment variable.
pub fn resolve_api_key(api_key_env: &str) -> Result<String> {
    match std::env::var(api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(Error::MissingApiKey(api_key_env.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Gemini wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
        "tools": [{ "google_search": {} }],
    })
}

/// Decode a `generateContent` response body.
pub fn decode_response(body: &str) -> Result<Generation> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| Error::Generation(format!("failed to parse Gemini response: {e}")))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::Generation("Gemini response has no candidates".to_string()))?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .map(|chunk| match chunk.web {
            Some(web) => GroundingCitation {
                uri: web.uri,
                title: web.title,
            },
            None => GroundingCitation::default(),
        })
        .collect();

    Ok(Generation { text, citations })
}

fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("Gemini API error {status}: {}", parsed.error.message),
        Err(_) => format!("Gemini API error {status}"),
    }
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = resolve_api_key(&config.api_key_env)?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &Config, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: endpoint(&config.api_base, &config.model),
            api_key,
        }
    }
}

pub fn endpoint(api_base: &str, model: &str) -> String {
    format!(
        "{}/models/{model}:generateContent",
        api_base.trim_end_matches('/')
    )
}

impl GenerationClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<Generation> {
        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "sending Gemini request");

        match self
            .agent
            .post(&self.endpoint)
            .set("x-goog-api-key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(request_body(prompt))
        {
            Ok(response) => {
                let body = response.into_string()?;
                debug!(body_len = body.len(), "received Gemini response");
                decode_response(&body)
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(Error::Generation(api_error_message(code, &body)))
            }
            Err(e) => Err(Error::Generation(format!("Gemini request failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_request_body_enables_search() {
        let body = request_body("is school open?");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "is school open?");
        assert!(body["tools"][0].get("google_search").is_some());
    }

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(
            endpoint("https://example.test/v1beta/", "gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_decode_text_and_citations() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "STATUS: OPEN\n"}, {"text": "SUMMARY: No alerts found."}]
                },
                "groundingMetadata": {
                    "webSearchQueries": ["Delaware City Schools status"],
                    "groundingChunks": [
                        {"web": {"uri": "https://dcs.k12.oh.us", "title": "dcs.k12.oh.us"}},
                        {"web": {"uri": "https://10tv.com/x"}},
                        {"retrievedContext": {}}
                    ]
                }
            }]
        }"#;
        let generation = decode_response(body).unwrap();
        assert_eq!(generation.text, "STATUS: OPEN\nSUMMARY: No alerts found.");
        assert_eq!(generation.citations.len(), 3);
        assert_eq!(
            generation.citations[0],
            GroundingCitation::new("https://dcs.k12.oh.us", "dcs.k12.oh.us")
        );
        assert_eq!(generation.citations[1].title, None);
        assert_eq!(generation.citations[2], GroundingCitation::default());
    }

    #[test]
    fn test_decode_without_grounding() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "STATUS: CLOSED"}]}}]}"#;
        let generation = decode_response(body).unwrap();
        assert_eq!(generation.text, "STATUS: CLOSED");
        assert!(generation.citations.is_empty());
    }

    #[test]
    fn test_decode_candidate_without_content() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let generation = decode_response(body).unwrap();
        assert!(generation.text.is_empty());
    }

    #[test]
    fn test_decode_no_candidates_errors() {
        let err = decode_response(r#"{"promptFeedback": {}}"#).unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn test_decode_malformed_errors() {
        let err = decode_response("<html>").unwrap_err();
        assert!(err.to_string().contains("failed to parse Gemini response"));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid."}}"#;
        assert_eq!(
            api_error_message(400, body),
            "Gemini API error 400: API key not valid."
        );
        assert_eq!(api_error_message(503, ""), "Gemini API error 503");
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_from_env() {
        // SAFETY: serialized with the other env tests.
        unsafe { std::env::set_var("CLOSINGS_TEST_KEY", "abc123") };
        assert_eq!(resolve_api_key("CLOSINGS_TEST_KEY").unwrap(), "abc123");
        unsafe { std::env::remove_var("CLOSINGS_TEST_KEY") };
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_missing_or_blank() {
        unsafe { std::env::set_var("CLOSINGS_TEST_KEY", "  ") };
        let err = resolve_api_key("CLOSINGS_TEST_KEY").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey(_)));
        unsafe { std::env::remove_var("CLOSINGS_TEST_KEY") };

        let err = resolve_api_key("CLOSINGS_TEST_KEY").unwrap_err();
        assert!(err.to_string().contains("CLOSINGS_TEST_KEY"));
    }
}
