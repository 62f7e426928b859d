//! Request and response types for the text-completion service, plus the
//! client seam the pipeline calls through.
//!
//! Retry, backoff and timeouts are the transport's business; a client hands
//! back either a resolved response or an [`EngineError`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::environment::ModelSettings;
use crate::error::EngineError;
use crate::TARGET_LLM_REQUEST;

/// Desired shape of the model's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Json,
    Text,
}

impl ResponseShape {
    fn mime_type(self) -> &'static str {
        match self {
            ResponseShape::Json => "application/json",
            ResponseShape::Text => "text/plain",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

/// A single prompt with its generation parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

impl GenerationRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
                response_mime_type: ResponseShape::Text.mime_type().to_string(),
            },
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation_config.max_output_tokens = max_output_tokens;
        self
    }

    pub fn response_shape(mut self, shape: ResponseShape) -> Self {
        self.generation_config.response_mime_type = shape.mime_type().to_string();
        self
    }

    pub fn prompt(&self) -> String {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .map(|p| p.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: Option<Value>,
}

/// One content fragment: text, a structured payload, or both absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub structured: Option<Value>,
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

/// Raw model output. Read-only input to the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModelResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

impl RawModelResponse {
    pub fn from_text(text: &str) -> Self {
        Self::from_fragments(&[text])
    }

    pub fn from_fragments(fragments: &[&str]) -> Self {
        let parts = fragments
            .iter()
            .map(|f| ResponsePart {
                text: Some(f.to_string()),
                ..Default::default()
            })
            .collect();
        Self::from_parts(parts)
    }

    pub fn from_structured(payload: Value) -> Self {
        Self::from_parts(vec![ResponsePart {
            structured: Some(payload),
            ..Default::default()
        }])
    }

    fn from_parts(parts: Vec<ResponsePart>) -> Self {
        RawModelResponse {
            candidates: vec![Candidate {
                content: Some(ResponseContent { parts }),
                finish_reason: None,
            }],
            error: None,
        }
    }

    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// First directly-typed structured payload, if any part carries one.
    pub fn structured(&self) -> Option<&Value> {
        self.parts().find_map(|p| {
            p.structured
                .as_ref()
                .or_else(|| p.function_call.as_ref().and_then(|f| f.args.as_ref()))
        })
    }

    /// All text fragments concatenated in order.
    pub fn text(&self) -> String {
        self.parts().filter_map(|p| p.text.as_deref()).collect()
    }
}

/// The text-completion collaborator.
#[allow(async_fn_in_trait)]
pub trait ModelClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<RawModelResponse, EngineError>;
}

/// HTTP client for a `generateContent`-style endpoint
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    http: reqwest::Client,
    settings: ModelSettings,
}

impl HttpModelClient {
    pub fn new(settings: ModelSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

impl ModelClient for HttpModelClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<RawModelResponse, EngineError> {
        if self.settings.api_key.is_empty() {
            return Err(EngineError::configuration("model API key is empty"));
        }

        debug!(
            target: TARGET_LLM_REQUEST,
            "Sending request to {} ({} prompt chars)",
            self.settings.model,
            request.prompt().len()
        );

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(target: TARGET_LLM_REQUEST, "Model request failed with status {}: {}", status, body);
            return Err(EngineError::upstream(status.as_u16(), body));
        }

        let parsed: RawModelResponse = response.json().await?;
        if let Some(err) = &parsed.error {
            error!(target: TARGET_LLM_REQUEST, "Model returned error {}: {}", err.code, err.message);
            return Err(EngineError::upstream(err.code, err.message.clone()));
        }

        info!(
            target: TARGET_LLM_REQUEST,
            "Model response received: {} candidate(s)",
            parsed.candidates.len()
        );
        Ok(parsed)
    }
}
