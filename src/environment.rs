use std::env;

use crate::error::EngineError;
use crate::llm::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};

pub const API_KEY_VAR: &str = "SPECMATCH_LLM_API_KEY";
pub const ENDPOINT_VAR: &str = "SPECMATCH_LLM_ENDPOINT";
pub const MODEL_VAR: &str = "SPECMATCH_LLM_MODEL";
pub const TEMPERATURE_VAR: &str = "SPECMATCH_LLM_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "SPECMATCH_LLM_MAX_TOKENS";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Settings for the model client
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl ModelSettings {
    /// Load settings from the environment. The API key is required; every
    /// other value falls back to a default when unset or unparsable.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load settings through an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| EngineError::configuration(format!("{API_KEY_VAR} is not set")))?;

        Ok(ModelSettings {
            api_key,
            endpoint: lookup(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: lookup(TEMPERATURE_VAR)
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_output_tokens: lookup(MAX_TOKENS_VAR)
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        })
    }
}
