use super::schema::{candidate_text, request_body};
use super::{GeminiError, VisionModel};
use shared::Plant;
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin client over the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Reads `GEMINI_API_KEY` (required), `GEMINI_MODEL` and
    /// `GEMINI_TIMEOUT_SECS` (both optional) from the environment.
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| GeminiError::MissingApiKey)?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(api_key, model, Duration::from_secs(timeout))
    }

    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GeminiError> {
        // Client-level timeout bounds the whole upstream call; expiry
        // surfaces as an ordinary request error.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeminiError::BuildClient)?;
        Ok(Self {
            http,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

impl VisionModel for GeminiClient {
    async fn identify(&self, image: &str, mime_type: &str) -> Result<Plant, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(image, mime_type))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let doc: serde_json::Value = response.json().await?;
        let text = candidate_text(&doc).ok_or(GeminiError::EmptyResponse)?;
        log::debug!("Gemini candidate text: {}", text);

        // Deserializing into the closed Plant type is the safety boundary
        // against a non-conforming provider.
        let plant: Plant = serde_json::from_str(text)?;
        Ok(plant)
    }
}
