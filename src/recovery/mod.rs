//! Recovery of structured data from unreliable model output.
//!
//! Model responses are frequently truncated, wrapped in prose or fenced as
//! markdown. Recovery runs a fixed preprocessing pass and then an ordered
//! chain of strategies, each a pure `&str -> Option<Value>` function; the
//! first strategy whose output survives validation wins. Failure is `None`,
//! never an error: callers treat it as "no data".

mod manual;
mod repair;
mod validate;

pub use manual::extract_manually;
pub use repair::{repair_incomplete, strip_echoed_names, strip_preamble, truncate_trailing_prose};
pub use validate::{validate_output, MAX_CONFIG_OPTIONS, MAX_KEY_OPTIONS};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm::RawModelResponse;
use crate::spec::types::ConfigKeySet;

pub const TARGET_RECOVERY: &str = "recovery";

/// A named recovery strategy
pub type Strategy = (&'static str, fn(&str) -> Option<Value>);

fn direct_parse(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(target: TARGET_RECOVERY, "Direct parse failed: {}", e);
            None
        }
    }
}

fn parse_repaired(text: &str) -> Option<Value> {
    let repaired = repair_incomplete(text);
    match serde_json::from_str(&repaired) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(target: TARGET_RECOVERY, "Parse after repair failed: {}", e);
            None
        }
    }
}

pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    ("direct_parse", direct_parse),
    ("repair_incomplete", parse_repaired),
    ("manual_extraction", extract_manually),
];

/// Runs the preprocessing pass and strategy chain over model output
#[derive(Clone)]
pub struct JsonRecovery {
    strategies: Vec<Strategy>,
}

impl Default for JsonRecovery {
    fn default() -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }
}

impl JsonRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategies(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Best-effort structured object for a model response.
    ///
    /// A structured payload carried by the response is returned verbatim.
    /// Otherwise the text fragments are joined, cleaned and fed through the
    /// strategy chain; the winning object comes back in validated
    /// `{config, keys, buyers}` shape.
    pub fn recover(&self, response: &RawModelResponse) -> Option<Value> {
        if let Some(structured) = response.structured() {
            debug!(target: TARGET_RECOVERY, "Using structured payload from response");
            return Some(structured.clone());
        }

        let text = response.text();
        if text.trim().is_empty() {
            debug!(target: TARGET_RECOVERY, "Response carries no text");
            return None;
        }

        self.recover_text(&text)
    }

    /// Run preprocessing and the strategy chain over raw text.
    pub fn recover_text(&self, text: &str) -> Option<Value> {
        let cleaned = strip_echoed_names(truncate_trailing_prose(strip_preamble(text)));

        for (name, strategy) in &self.strategies {
            let Some(value) = strategy(&cleaned) else {
                continue;
            };
            match validate_output(&value) {
                Some(bundle) => {
                    info!(
                        target: TARGET_RECOVERY,
                        "Recovered bundle via {}: config '{}' with {} option(s), {} key(s)",
                        name,
                        bundle.config.name,
                        bundle.config.options.len(),
                        bundle.keys.len()
                    );
                    return serde_json::to_value(&bundle).ok();
                }
                None => debug!(target: TARGET_RECOVERY, "Strategy {} produced an unusable shape", name),
            }
        }

        warn!(
            target: TARGET_RECOVERY,
            "All recovery strategies failed for {} chars of model output",
            text.len()
        );
        None
    }

    /// Recover and convert to a typed bundle.
    pub fn recover_bundle(&self, response: &RawModelResponse) -> Option<ConfigKeySet> {
        self.recover(response).as_ref().and_then(validate_output)
    }
}
