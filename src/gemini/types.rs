//! Wire types for the generateContent endpoint
//!
//! The REST surface uses camelCase field names; the serde derives keep the
//! Rust side idiomatic. Request and response share `Content`/`Part`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output aspect ratios the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Square,
    Portrait3x4,
    Landscape4x3,
    Portrait9x16,
    Landscape16x9,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape16x9,
    ];

    /// The service-side spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One request or response part: inline binary data or text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn inline_png(base64_data: String) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: "image/png".to_string(),
                data: base64_data,
            }),
            ..Self::default()
        }
    }
}

/// An image embedded directly in a part, base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::inline_png("QUJD".to_string()), Part::text("prompt")],
            }],
            generation_config: Some(GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: AspectRatio::Portrait3x4.as_str().to_string(),
                },
            }),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"inlineData\""));
        assert!(json.contains("\"mimeType\":\"image/png\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"imageConfig\""));
        assert!(json.contains("\"aspectRatio\":\"3:4\""));
        // Empty optional fields stay off the wire
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_aspect_ratio_spellings() {
        let spellings: Vec<&str> = AspectRatio::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(spellings, ["1:1", "3:4", "4:3", "9:16", "16:9"]);
        assert_eq!(AspectRatio::default(), AspectRatio::Square);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert!(response.candidates[0].content.is_none());
    }
}
