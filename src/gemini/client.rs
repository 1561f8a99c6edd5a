//! Generation client
//!
//! Performs exactly one request/response cycle with the image generation
//! service per invocation: reference image and composed prompt out, first
//! inline image payload back. No retries, no partial results; every
//! failure is surfaced to the caller as a `GenerationError`.

use base64::Engine;
use thiserror::Error;

use super::types::{
    AspectRatio, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, Part,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Request timeout. Image generation is slow; this only bounds a hung
/// connection, not a healthy render.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// Everything that can go wrong on the generation path.
///
/// Variants carry strings rather than source errors so results can flow
/// through the GUI's `Clone` message enum.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("response contained no inline image payload")]
    NoImage,

    #[error("image payload could not be decoded: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.to_string())
    }
}

/// Client for the Gemini image generation endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            // Builder only fails on TLS backend misconfiguration
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the environment
    pub fn from_env() -> Result<Self, GenerationError> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .map(Self::new)
            .ok_or(GenerationError::MissingApiKey)
    }

    /// One generation round trip: reference image + prompt in, PNG bytes out
    pub async fn render_perspective(
        &self,
        reference_png: &[u8],
        instruction: &str,
        aspect: AspectRatio,
    ) -> Result<Vec<u8>, GenerationError> {
        let request = build_request(reference_png, instruction, aspect);
        let url = format!("{}/{}:generateContent", API_BASE, IMAGE_MODEL);

        log::info!("Requesting perspective render ({} aspect)", aspect);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_inline_image(&body)
    }
}

/// Assemble the multi-part request body
pub(crate) fn build_request(
    reference_png: &[u8],
    instruction: &str,
    aspect: AspectRatio,
) -> GenerateContentRequest {
    let encoded = base64::engine::general_purpose::STANDARD.encode(reference_png);

    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part::inline_png(encoded), Part::text(instruction)],
        }],
        generation_config: Some(GenerationConfig {
            image_config: ImageConfig {
                aspect_ratio: aspect.as_str().to_string(),
            },
        }),
    }
}

/// Scan the response for the first inline image payload and decode it
pub(crate) fn extract_inline_image(
    response: &GenerateContentResponse,
) -> Result<Vec<u8>, GenerationError> {
    let payload = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.iter().find_map(|part| part.inline_data.as_ref()))
        .ok_or(GenerationError::NoImage)?;

    base64::engine::general_purpose::STANDARD
        .decode(&payload.data)
        .map_err(|e| GenerationError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_image_then_prompt() {
        let request = build_request(b"png-bytes", "render it", AspectRatio::Square);

        assert_eq!(request.contents.len(), 1);
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);

        let inline = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&inline.data)
                .unwrap(),
            b"png-bytes"
        );
        assert_eq!(parts[1].text.as_deref(), Some("render it"));
    }

    #[test]
    fn test_extract_decodes_first_inline_image() {
        let png = vec![0x89, b'P', b'N', b'G'];
        let json = format!(
            r#"{{"candidates":[{{"content":{{"parts":[
                {{"text":"here is your render"}},
                {{"inlineData":{{"mimeType":"image/png","data":"{}"}}}},
                {{"inlineData":{{"mimeType":"image/png","data":"AAAA"}}}}
            ]}}}}]}}"#,
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        let response: GenerateContentResponse = serde_json::from_str(&json).unwrap();

        let bytes = extract_inline_image(&response).unwrap();
        assert_eq!(bytes, png);
    }

    #[test]
    fn test_no_inline_image_is_an_error() {
        // Text-only parts
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"sorry, no image"}]}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            extract_inline_image(&response),
            Err(GenerationError::NoImage)
        ));

        // No candidates at all
        let response = GenerateContentResponse::default();
        assert!(matches!(
            extract_inline_image(&response),
            Err(GenerationError::NoImage)
        ));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"inlineData":{"mimeType":"image/png","data":"not base64!!"}}
            ]}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            extract_inline_image(&response),
            Err(GenerationError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_from_env_requires_key() {
        // The variable is absent or empty in the test environment unless
        // the developer exported one; only assert the empty-string path.
        std::env::set_var(API_KEY_ENV, "");
        assert!(matches!(
            GeminiClient::from_env(),
            Err(GenerationError::MissingApiKey)
        ));
        std::env::remove_var(API_KEY_ENV);
    }
}
