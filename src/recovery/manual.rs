//! Last-resort regex extraction from text that no longer parses as JSON.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use super::validate::{MAX_CONFIG_OPTIONS, MAX_KEY_OPTIONS};
use super::TARGET_RECOVERY;
use crate::spec::types::MAX_KEYS;

// Labels tried, in order, when hunting for key specifications.
const KEY_LABELS: &[&str] = &["Finish", "Standard", "Type", "Size", "Thickness"];

// Config names guessed from the raw text when no name pattern matches.
const FALLBACK_CONFIG_NAMES: &[&str] = &["Grade", "Material", "Size", "Specification"];

// Structural words that are never option values.
const STRUCTURAL_WORDS: &[&str] = &["name", "options", "config", "keys", "buyers"];

// Config option lists shorter than this are topped up from loose candidates.
const SHORT_OPTION_COUNT: usize = 2;

const MIN_LOOSE_OPTION_CHARS: usize = 2;
const MAX_LOOSE_OPTION_CHARS: usize = 29;

lazy_static! {
    static ref CONFIG_NAME_RE: Regex =
        Regex::new(r#"(?s)"config"\s*:\s*\{\s*"name"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("valid config-name regex");
    static ref ANY_NAME_RE: Regex =
        Regex::new(r#""name"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid name regex");
    static ref OPTIONS_ARRAY_RE: Regex =
        Regex::new(r#"(?s)"options"\s*:\s*\[([^\]]*)"#).expect("valid options regex");
    static ref QUOTED_RE: Regex =
        Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid quoted-string regex");
    static ref KEY_LABEL_RES: Vec<Regex> = KEY_LABELS
        .iter()
        .filter_map(|label| {
            // The gap stays inside one object so a key never takes a later spec's options
            Regex::new(&format!(
                r#"(?is)"name"\s*:\s*"([^"]*{}[^"]*)"[^{{}}]*?"options"\s*:\s*\[([^\]]*)"#,
                regex::escape(label)
            ))
            .ok()
        })
        .collect();
}

/// Pull a config name, its options and up to three keys out of broken JSON.
///
/// Returns an object in the usual `{config, keys, buyers}` shape, or `None`
/// when neither a usable config nor a single key could be found.
pub fn extract_manually(text: &str) -> Option<Value> {
    let config_name = find_config_name(text);

    let mut options: Vec<String> = OPTIONS_ARRAY_RE
        .captures(text)
        .map(|caps| quoted_values(&caps[1]))
        .unwrap_or_default()
        .into_iter()
        .filter(|o| !o.is_empty() && !o.eq_ignore_ascii_case(&config_name))
        .collect();

    if options.len() < SHORT_OPTION_COUNT {
        for candidate in loose_option_candidates(text, &config_name) {
            if options.len() >= MAX_CONFIG_OPTIONS {
                break;
            }
            if !options.iter().any(|o| o.eq_ignore_ascii_case(&candidate)) {
                options.push(candidate);
            }
        }
    }
    options.truncate(MAX_CONFIG_OPTIONS);

    let mut keys: Vec<Value> = Vec::new();
    for re in KEY_LABEL_RES.iter() {
        if keys.len() >= MAX_KEYS {
            break;
        }
        let Some(caps) = re.captures(text) else {
            continue;
        };
        let name = caps[1].trim().to_string();
        if name.is_empty()
            || name.eq_ignore_ascii_case(&config_name)
            || keys.iter().any(|k| k["name"] == name.as_str())
        {
            continue;
        }
        let key_options: Vec<String> = quoted_values(&caps[2])
            .into_iter()
            .filter(|o| !o.is_empty())
            .take(MAX_KEY_OPTIONS)
            .collect();
        if !key_options.is_empty() {
            keys.push(json!({"name": name, "options": key_options}));
        }
    }

    let has_config = !config_name.is_empty() && !options.is_empty();
    debug!(
        target: TARGET_RECOVERY,
        "Manual extraction found config '{}' with {} option(s) and {} key(s)",
        config_name,
        options.len(),
        keys.len()
    );

    if !has_config && keys.is_empty() {
        return None;
    }

    Some(json!({
        "config": {"name": config_name, "options": options},
        "keys": keys,
        "buyers": [],
    }))
}

fn find_config_name(text: &str) -> String {
    if let Some(caps) = CONFIG_NAME_RE
        .captures(text)
        .or_else(|| ANY_NAME_RE.captures(text))
    {
        let name = caps[1].trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    let lower = text.to_lowercase();
    FALLBACK_CONFIG_NAMES
        .iter()
        .find(|guess| lower.contains(&guess.to_lowercase()))
        .map(|guess| guess.to_string())
        .unwrap_or_default()
}

/// Any quoted string of plausible option length that is not a structural
/// keyword or the config name.
fn loose_option_candidates(text: &str, config_name: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for value in quoted_values(text) {
        let len = value.chars().count();
        if !(MIN_LOOSE_OPTION_CHARS..=MAX_LOOSE_OPTION_CHARS).contains(&len) {
            continue;
        }
        let lower = value.to_lowercase();
        if STRUCTURAL_WORDS.contains(&lower.as_str()) || value.eq_ignore_ascii_case(config_name) {
            continue;
        }
        if !candidates.contains(&value) {
            candidates.push(value);
        }
        if candidates.len() >= MAX_CONFIG_OPTIONS {
            break;
        }
    }
    candidates
}

fn quoted_values(text: &str) -> Vec<String> {
    QUOTED_RE
        .captures_iter(text)
        .map(|caps| caps[1].replace("\\\"", "\"").trim().to_string())
        .collect()
}
