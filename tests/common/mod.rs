// Shared helpers for the integration tests: a mock Gemini endpoint and a
// stylist wired to it.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use stylecast::{GeminiClient, StylistConfig, Stylist};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";
pub const MODEL: &str = "gemini-2.5-flash";

pub const SCENARIO_A_JSON: &str =
    r#"{"outfit":"Navy suit","footwear":"Leather oxfords","accessories":"Umbrella","stylingTips":"Layer for rain"}"#;

pub fn generate_path() -> String {
    format!("/models/{}:generateContent", MODEL)
}

pub fn config_for(server: &MockServer, timeout: Duration) -> StylistConfig {
    StylistConfig {
        api_key: API_KEY.to_string(),
        api_base: server.uri(),
        model: MODEL.to_string(),
        timeout,
    }
}

pub fn stylist_for(server: &MockServer) -> Arc<Stylist> {
    stylist_with_timeout(server, Duration::from_secs(5))
}

pub fn stylist_with_timeout(server: &MockServer, timeout: Duration) -> Arc<Stylist> {
    let client = GeminiClient::new(&config_for(server, timeout)).expect("client should build");
    Arc::new(Stylist::new(Arc::new(client)))
}

/// A successful generateContent body whose first candidate says `text`.
pub fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"code": status, "message": message, "status": "INTERNAL"}
    }))
}

/// Matches recommendation requests (the ones constrained to JSON output).
pub fn recommendation_request() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
}

/// Matches chat requests (the ones carrying a system instruction).
pub fn chat_request() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_string_contains("systemInstruction"))
}

pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.body_json::<Value>().expect("request body should be JSON"))
        .collect()
}
