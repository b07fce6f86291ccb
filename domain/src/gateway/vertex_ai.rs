//! Vertex AI Gemini client implementing the provider-agnostic
//! `research_ai::Provider` trait.

use async_trait::async_trait;
use log::*;
use research_ai::{Error as AiError, Provider};
use serde::{Deserialize, Serialize};
use service::config::Config;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct ErrorInfo {
    code: i32,
    message: String,
    status: String,
}

/// Client for the Vertex AI `generateContent` endpoint.
pub struct VertexAi {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    region: String,
    model: String,
}

impl VertexAi {
    pub fn new(config: &Config) -> Result<Self, AiError> {
        let base_url = format!(
            "https://{}-aiplatform.googleapis.com",
            config.vertex_ai_region()
        );
        Self::with_base_url(config, base_url)
    }

    /// Override the API host. Used by tests to point at a mock server.
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self, AiError> {
        let project_id = config.gcp_project_id().ok_or_else(|| {
            AiError::Configuration("GCP project id is not configured".to_string())
        })?;
        let access_token = config.google_access_token().ok_or_else(|| {
            AiError::Configuration("Google access token is not configured".to_string())
        })?;

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth_value =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", access_token)).map_err(
                |err| AiError::Configuration(format!("Invalid access token header: {err}")),
            )?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()
            .map_err(|err| AiError::Configuration(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            project_id,
            region: config.vertex_ai_region().to_string(),
            model: config.vertex_ai_model().to_string(),
        })
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url, self.project_id, self.region, self.model
        )
    }
}

#[async_trait]
impl Provider for VertexAi {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Sending prompt to Vertex AI model {}", self.model);

        let response = self
            .client
            .post(self.generate_content_url())
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AiError::Network(err.to_string()))?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|err| AiError::Deserialization(err.to_string()))?;

        if let Some(error) = gemini_response.error {
            warn!(
                "Gemini API error {} ({}): {}",
                error.code, error.status, error.message
            );
            return Err(AiError::Provider(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| AiError::Provider("no response from Gemini".to_string()))
    }

    fn provider_id(&self) -> &str {
        "vertex_ai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_config() -> Config {
        Config::parse_from([
            "resana",
            "--gcp-project-id",
            "resana-test",
            "--google-access-token",
            "ya29.test-token",
            "--vertex-ai-region",
            "asia-southeast1",
            "--vertex-ai-model",
            "gemini-2.0-flash-exp",
        ])
    }

    const GENERATE_PATH: &str = "/v1/projects/resana-test/locations/asia-southeast1/publishers/google/models/gemini-2.0-flash-exp:generateContent";

    #[test]
    fn creation_fails_without_a_project_id() {
        let config = Config::parse_from(["resana", "--google-access-token", "ya29.test-token"]);
        assert!(VertexAi::new(&config).is_err());
    }

    #[tokio::test]
    async fn generate_returns_the_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_header("authorization", "Bearer ya29.test-token")
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "Use a paired t-test."}]}}]}"#,
            )
            .create_async()
            .await;

        let provider = VertexAi::with_base_url(&test_config(), server.url()).unwrap();
        let text = provider.generate("Which test should I use?").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Use a paired t-test.");
    }

    #[tokio::test]
    async fn generate_surfaces_api_error_payloads() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(
                r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#,
            )
            .create_async()
            .await;

        let provider = VertexAi::with_base_url(&test_config(), server.url()).unwrap();
        let result = provider.generate("prompt").await;

        match result {
            Err(AiError::Provider(message)) => assert!(message.contains("Quota exceeded")),
            other => panic!("expected a provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_reports_an_empty_candidate_list() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let provider = VertexAi::with_base_url(&test_config(), server.url()).unwrap();
        let result = provider.generate("prompt").await;

        assert!(matches!(result, Err(AiError::Provider(_))));
    }

    #[test]
    fn provider_id_is_stable() {
        let provider = VertexAi::new(&test_config()).unwrap();
        assert_eq!(provider.provider_id(), "vertex_ai");
    }
}
