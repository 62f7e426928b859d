//! Shape validation applied to every successfully recovered object.

use serde_json::Value;
use tracing::debug;

use super::TARGET_RECOVERY;
use crate::spec::types::{ConfigKeySet, SpecificationRecord, MAX_BUYERS, MAX_KEYS};

pub const MAX_CONFIG_OPTIONS: usize = 8;
pub const MAX_KEY_OPTIONS: usize = 6;
const MAX_OPTION_CHARS: usize = 49;

/// Normalize a parsed object into a [`ConfigKeySet`].
///
/// Config options must be 1-49 characters and differ from the config name
/// (at most 8 kept). Keys need a non-empty name different from the config
/// name and at least one non-empty option (at most 6 kept, at most 3 keys).
/// Buyers are only capped. Returns `None` for anything that is not an object
/// or carries neither `config` nor `keys`.
pub fn validate_output(value: &Value) -> Option<ConfigKeySet> {
    let obj = value.as_object()?;
    if !obj.contains_key("config") && !obj.contains_key("keys") {
        debug!(target: TARGET_RECOVERY, "Recovered object has neither config nor keys");
        return None;
    }

    let config_value = obj.get("config");
    let config_name = config_value
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let config_options: Vec<String> = string_items(config_value.and_then(|c| c.get("options")))
        .filter(|o| {
            let len = o.chars().count();
            (1..=MAX_OPTION_CHARS).contains(&len) && !o.eq_ignore_ascii_case(&config_name)
        })
        .take(MAX_CONFIG_OPTIONS)
        .collect();

    let keys: Vec<SpecificationRecord> = obj
        .get("keys")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(|key| {
                    let name = key.get("name").and_then(Value::as_str)?.trim();
                    if name.is_empty() || name.eq_ignore_ascii_case(&config_name) {
                        return None;
                    }
                    let options: Vec<String> = string_items(key.get("options"))
                        .filter(|o| !o.is_empty())
                        .take(MAX_KEY_OPTIONS)
                        .collect();
                    (!options.is_empty()).then(|| SpecificationRecord::new(name, options))
                })
                .take(MAX_KEYS)
                .collect()
        })
        .unwrap_or_default();

    let buyers: Vec<SpecificationRecord> = obj
        .get("buyers")
        .and_then(Value::as_array)
        .map(|buyers| {
            buyers
                .iter()
                .take(MAX_BUYERS)
                .filter_map(|buyer| {
                    let name = buyer.get("name").and_then(Value::as_str).unwrap_or_default();
                    let options: Vec<String> = string_items(buyer.get("options")).collect();
                    buyer
                        .is_object()
                        .then(|| SpecificationRecord::new(name, options))
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ConfigKeySet {
        config: SpecificationRecord::new(&config_name, config_options),
        keys,
        buyers,
    })
}

/// Trimmed string entries of a JSON array; anything else is skipped.
fn string_items(value: Option<&Value>) -> impl Iterator<Item = String> + '_ {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(validate_output(&json!([1, 2])).is_none());
        assert!(validate_output(&json!("config")).is_none());
        assert!(validate_output(&json!({"buyers": []})).is_none());
    }

    #[test]
    fn test_config_option_filtering() {
        let long = "x".repeat(50);
        let value = json!({
            "config": {
                "name": "Grade",
                "options": ["GRADE", "", long, 42, "304", "316", "a", "b", "c", "d", "e", "f", "g"]
            }
        });
        let bundle = validate_output(&value).unwrap();
        assert_eq!(bundle.config.name, "Grade");
        assert_eq!(
            bundle.config.options,
            vec!["304", "316", "a", "b", "c", "d", "e", "f"]
        );
    }

    #[test]
    fn test_key_filtering() {
        let value = json!({
            "config": {"name": "Grade", "options": ["304"]},
            "keys": [
                {"name": "grade", "options": ["x"]},
                {"name": "", "options": ["x"]},
                {"name": "Finish", "options": []},
                {"name": "Standard", "options": ["IS 2062", "", "1", "2", "3", "4", "5", "6"]},
                {"name": "Type", "options": ["Coil"]},
                {"name": "Size", "options": ["1 mm"]},
                {"name": "Width", "options": ["1250 mm"]}
            ],
            "buyers": [{"name": "A", "options": []}, {"name": "B"}, {"name": "C"}]
        });
        let bundle = validate_output(&value).unwrap();
        let names: Vec<&str> = bundle.keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Standard", "Type", "Size"]);
        assert_eq!(bundle.keys[0].options.len(), MAX_KEY_OPTIONS);
        assert_eq!(bundle.keys[0].options[0], "IS 2062");
        assert_eq!(bundle.buyers.len(), 2);
    }

    #[test]
    fn test_keys_without_config() {
        let value = json!({"keys": [{"name": "Finish", "options": ["2B"]}]});
        let bundle = validate_output(&value).unwrap();
        assert!(bundle.config.name.is_empty());
        assert_eq!(bundle.keys.len(), 1);
    }
}
