use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::StylistConfig;
use crate::error::{StylistError, StylistResult};

// Structures matching Gemini's generateContent endpoint (REST JSON, camelCase).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thin client for the hosted model. Built once and shared behind an `Arc`.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &StylistConfig) -> StylistResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// One-shot request constrained to JSON matching `schema`. Returns the
    /// raw text; parsing belongs to the caller.
    #[instrument(skip(self, prompt, schema), fields(model = %self.model))]
    pub async fn generate_json(&self, prompt: &str, schema: Value) -> StylistResult<String> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        };

        self.generate(&request)
            .await?
            .ok_or(StylistError::EmptyResponse)
    }

    /// A single chat turn under `system_instruction`. `Ok(None)` means the
    /// call worked but the model produced no text.
    #[instrument(skip(self, system_instruction, message), fields(model = %self.model))]
    pub async fn chat(&self, system_instruction: &str, message: &str) -> StylistResult<Option<String>> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), message)],
            system_instruction: Some(Content::text(None, system_instruction)),
            generation_config: None,
        };

        self.generate(&request).await
    }

    async fn generate(&self, request: &GenerateRequest) -> StylistResult<Option<String>> {
        let url = self.endpoint();
        debug!(%url, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or(body, |e| e.message);
            error!(%status, %message, "Gemini API request failed");
            return Err(StylistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| StylistError::Api {
            status: status.as_u16(),
            message: format!("unreadable response body: {}", e),
        })?;

        if let Some(err) = parsed.error {
            return Err(StylistError::Api {
                status: status.as_u16(),
                message: err.message,
            });
        }

        let text = extract_text(parsed.candidates);
        debug!(chars = text.as_deref().map_or(0, str::len), "Received Gemini response");
        Ok(text)
    }
}

// Concatenates the text parts of the first candidate; None if there are none.
fn extract_text(candidates: Option<Vec<Candidate>>) -> Option<String> {
    let content = candidates?.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), "hello")],
            system_instruction: Some(Content::text(None, "be nice")),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: json!({"type": "OBJECT"}),
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be nice");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_chat_request_omits_generation_config() {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), "hi")],
            system_instruction: None,
            generation_config: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("generationConfig").is_none());
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Navy "}, {"text": "tie"}]}}]
        }))
        .unwrap();
        assert_eq!(extract_text(response.candidates).as_deref(), Some("Navy tie"));
    }

    #[test]
    fn test_extract_text_handles_missing_content() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(extract_text(response.candidates).is_none());

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(empty.candidates).is_none());
    }
}
