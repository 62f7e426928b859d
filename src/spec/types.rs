use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a specification within a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Primary,
    Secondary,
    Tertiary,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary => write!(f, "Primary"),
            Tier::Secondary => write!(f, "Secondary"),
            Tier::Tertiary => write!(f, "Tertiary"),
        }
    }
}

impl Tier {
    /// Parse a tier label, ignoring case. Anything unknown yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "primary" => Some(Tier::Primary),
            "secondary" => Some(Tier::Secondary),
            "tertiary" => Some(Tier::Tertiary),
            _ => None,
        }
    }
}

/// A named product attribute with its permissible option values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationRecord {
    pub name: String,

    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

impl SpecificationRecord {
    pub fn new<S: Into<String>>(name: &str, options: impl IntoIterator<Item = S>) -> Self {
        SpecificationRecord {
            name: name.to_string(),
            options: options.into_iter().map(Into::into).collect(),
            tier: None,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }
}

/// One source's extracted specification bundle.
///
/// `keys` holds at most 3 records and `buyers` at most 2; the recovery and
/// text-block parsers enforce those bounds when they build a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigKeySet {
    pub config: SpecificationRecord,

    #[serde(default)]
    pub keys: Vec<SpecificationRecord>,

    #[serde(default)]
    pub buyers: Vec<SpecificationRecord>,
}

pub const MAX_KEYS: usize = 3;
pub const MAX_BUYERS: usize = 2;

impl ConfigKeySet {
    pub fn empty() -> Self {
        ConfigKeySet {
            config: SpecificationRecord::new::<String>("", []),
            keys: Vec::new(),
            buyers: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.config.name.is_empty() && self.keys.is_empty() && self.buyers.is_empty()
    }

    /// Flatten the bundle into tiered records: config is primary, keys are
    /// secondary and buyers tertiary. A config without a name is skipped.
    pub fn records(&self) -> Vec<SpecificationRecord> {
        let mut records = Vec::with_capacity(1 + self.keys.len() + self.buyers.len());

        if !self.config.name.trim().is_empty() {
            records.push(self.config.clone().with_tier(Tier::Primary));
        }
        records.extend(self.keys.iter().cloned().map(|k| k.with_tier(Tier::Secondary)));
        records.extend(self.buyers.iter().cloned().map(|b| b.with_tier(Tier::Tertiary)));

        records
    }
}

/// A specification judged equivalent across two sources.
///
/// `spec_name` and every entry of `common_options` are taken verbatim from the
/// authoritative (source A) side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonSpecEntry {
    pub spec_name: String,
    pub category: String,
    pub common_options: Vec<String>,
    pub source_a_unique_options: Vec<String>,
    pub source_b_unique_options: Vec<String>,
}

/// Placed in `common_options` when a spec matched but shares no option values.
pub const NO_COMMON_OPTIONS: &str = "No common options available";

impl CommonSpecEntry {
    /// True when the entry carries at least one real shared value.
    pub fn has_common_options(&self) -> bool {
        self.common_options.iter().any(|o| o != NO_COMMON_OPTIONS)
    }
}

/// Output of comparing two specification sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub common: Vec<CommonSpecEntry>,
    pub unique_a: Vec<SpecificationRecord>,
    pub unique_b: Vec<SpecificationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!(Tier::parse(" PRIMARY "), Some(Tier::Primary));
        assert_eq!(Tier::parse("secondary"), Some(Tier::Secondary));
        assert_eq!(Tier::parse("Tertiary"), Some(Tier::Tertiary));
        assert_eq!(Tier::parse("Finish"), None);
    }

    #[test]
    fn test_bundle_records_are_tiered() {
        let bundle = ConfigKeySet {
            config: SpecificationRecord::new("Grade", ["304", "316"]),
            keys: vec![SpecificationRecord::new("Finish", ["2B"])],
            buyers: vec![SpecificationRecord::new("Width", ["1250 mm"])],
        };

        let records = bundle.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].tier, Some(Tier::Primary));
        assert_eq!(records[1].tier, Some(Tier::Secondary));
        assert_eq!(records[2].tier, Some(Tier::Tertiary));
    }

    #[test]
    fn test_bundle_without_config_name() {
        let bundle = ConfigKeySet {
            keys: vec![SpecificationRecord::new("Finish", ["2B"])],
            ..ConfigKeySet::empty()
        };
        assert!(!bundle.is_empty());
        assert_eq!(bundle.records().len(), 1);
        assert!(ConfigKeySet::empty().is_empty());
    }

    #[test]
    fn test_deserialize_record_without_tier() {
        let record: SpecificationRecord =
            serde_json::from_str(r#"{"name":"Grade","options":["304"]}"#).unwrap();
        assert_eq!(record.tier, None);
        assert_eq!(record.options, vec!["304"]);
    }
}
