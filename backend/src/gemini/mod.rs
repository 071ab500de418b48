pub mod client;
pub mod schema;

pub use client::GeminiClient;

use shared::Plant;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("HTTP client error: {0}")]
    BuildClient(reqwest::Error),
    #[error("request to Gemini failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Gemini response carried no candidate text")]
    EmptyResponse,
    #[error("model output failed schema validation: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Seam between the HTTP handler and the multimodal model so the
/// endpoint can be exercised against a stub.
pub trait VisionModel: Send + Sync + 'static {
    /// Identifies the plant on a base64-encoded image.
    fn identify(
        &self,
        image: &str,
        mime_type: &str,
    ) -> impl Future<Output = Result<Plant, GeminiError>>;
}
