use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::matching::SpecMatcher;
use super::types::{CommonSpecEntry, SpecificationRecord, MAX_BUYERS, NO_COMMON_OPTIONS};
use super::TARGET_MATCHING;

/// Per-spec option cap applied to buyer specifications.
pub const MAX_BUYER_OPTIONS: usize = 10;

/// A buyer spec needs at least this many real shared options.
const MIN_BUYER_OPTIONS: usize = 2;

/// Filters, deduplicates and bounds option lists.
#[derive(Debug, Clone)]
pub struct OptionCurator {
    matcher: SpecMatcher,
    placeholder_re: Option<Regex>,
}

impl OptionCurator {
    pub fn new(matcher: SpecMatcher) -> Self {
        let placeholder_re = build_placeholder_regex(&matcher.vocabulary().placeholder_options);
        Self {
            matcher,
            placeholder_re,
        }
    }

    pub fn matcher(&self) -> &SpecMatcher {
        &self.matcher
    }

    /// True for "Other", "Others (specify)", "Any other", "Custom size" and the like.
    pub fn is_placeholder(&self, option: &str) -> bool {
        let lower = option.trim().to_lowercase();
        if lower.is_empty() {
            return true;
        }
        match &self.placeholder_re {
            Some(re) => re.is_match(&lower),
            None => self
                .matcher
                .vocabulary()
                .placeholder_options
                .iter()
                .any(|p| *p == lower),
        }
    }

    /// Drop placeholders and duplicates, keeping first-seen order.
    pub fn curate(&self, options: &[String]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut curated: Vec<String> = Vec::new();

        for option in options {
            let trimmed = option.trim();
            if self.is_placeholder(trimmed) {
                debug!(target: TARGET_MATCHING, "Dropping placeholder option '{}'", option);
                continue;
            }
            let key = trimmed.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            if curated.iter().any(|kept| self.matcher.options_similar(kept, trimmed)) {
                debug!(target: TARGET_MATCHING, "Dropping duplicate option '{}'", option);
                continue;
            }
            seen.insert(key);
            curated.push(trimmed.to_string());
        }

        curated
    }

    /// [`curate`](Self::curate) followed by a size cap.
    pub fn curate_with_cap(&self, options: &[String], cap: usize) -> Vec<String> {
        let mut curated = self.curate(options);
        curated.truncate(cap);
        curated
    }

    /// Curate every option list of a common entry. A matched spec left with
    /// nothing in common keeps the sentinel value.
    pub fn curate_entry(&self, entry: &CommonSpecEntry) -> CommonSpecEntry {
        let real: Vec<String> = entry
            .common_options
            .iter()
            .filter(|o| o.as_str() != NO_COMMON_OPTIONS)
            .cloned()
            .collect();
        let mut common_options = self.curate(&real);
        if common_options.is_empty() {
            common_options.push(NO_COMMON_OPTIONS.to_string());
        }

        CommonSpecEntry {
            spec_name: entry.spec_name.clone(),
            category: entry.category.clone(),
            common_options,
            source_a_unique_options: self.curate(&entry.source_a_unique_options),
            source_b_unique_options: self.curate(&entry.source_b_unique_options),
        }
    }

    /// Pick up to two buyer specifications from the common specs.
    ///
    /// A candidate must not name the same attribute as any of `taken_names`
    /// (typically the config and key specs) and must keep at least two real
    /// options after curation.
    pub fn select_buyer_specs(
        &self,
        common: &[CommonSpecEntry],
        taken_names: &[String],
    ) -> Vec<SpecificationRecord> {
        let candidates: Vec<SpecificationRecord> = common
            .iter()
            .filter(|entry| {
                !taken_names
                    .iter()
                    .any(|taken| self.matcher.names_similar(taken, &entry.spec_name))
            })
            .filter_map(|entry| {
                let real: Vec<String> = entry
                    .common_options
                    .iter()
                    .filter(|o| o.as_str() != NO_COMMON_OPTIONS)
                    .cloned()
                    .collect();
                let options = self.curate_with_cap(&real, MAX_BUYER_OPTIONS);
                (options.len() >= MIN_BUYER_OPTIONS)
                    .then(|| SpecificationRecord::new(&entry.spec_name, options))
            })
            .collect();

        let mut buyers = dedup_specs(&candidates);
        buyers.truncate(MAX_BUYERS);
        buyers
    }
}

/// Keep only the first record for each distinct option set. Two records
/// whose options are equal once lower-cased and sorted are duplicates even
/// when their names differ.
pub fn dedup_specs(records: &[SpecificationRecord]) -> Vec<SpecificationRecord> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut kept = Vec::new();

    for record in records {
        let mut signature: Vec<String> = record
            .options
            .iter()
            .map(|o| o.trim().to_lowercase())
            .collect();
        signature.sort();

        if seen.insert(signature) {
            kept.push(record.clone());
        } else {
            debug!(
                target: TARGET_MATCHING,
                "Dropping spec '{}': same option set as an earlier spec", record.name
            );
        }
    }

    kept
}

fn build_placeholder_regex(placeholders: &[String]) -> Option<Regex> {
    if placeholders.is_empty() {
        return None;
    }
    let alternatives = placeholders
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    // One optional word on either side: "any other", "other sizes", "custom made"
    let pattern =
        format!(r"^(?:[\w/-]+\s+)?(?:{alternatives})(?:\s+\(?[\w/-]+\)?|\s*\([\w/-]+\))?$");
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(target: TARGET_MATCHING, "Invalid placeholder pattern, using exact matching: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn curator() -> OptionCurator {
        OptionCurator::new(SpecMatcher::default())
    }

    #[test]
    fn test_placeholders() {
        let curator = curator();
        for value in ["Other", "others", "Any Other", "Other Sizes", "Various", "etc", "TBD", "N/A", "Custom Size", "Others (Specify)", ""] {
            assert!(curator.is_placeholder(value), "{value}");
        }
        for value in ["304", "Mild Steel", "2 mm", "Mother of pearl", "Hot Rolled", "Natural"] {
            assert!(!curator.is_placeholder(value), "{value}");
        }
    }

    #[test]
    fn test_curate_dedups_and_keeps_order() {
        let curator = curator();
        let curated = curator.curate(&strings(&["304", "SS 304", "Other", "316", "316 ", "2mm", "2.0 mm", "304L"]));
        assert_eq!(curated, strings(&["304", "316", "2mm", "304L"]));
    }

    #[test]
    fn test_curate_with_cap() {
        let curator = curator();
        let curated = curator.curate_with_cap(&strings(&["1 mm", "2 mm", "3 mm", "4 mm"]), 2);
        assert_eq!(curated, strings(&["1 mm", "2 mm"]));
    }

    #[test]
    fn test_dedup_specs_by_option_set() {
        let records = vec![
            SpecificationRecord::new("Grade", ["304", "316"]),
            SpecificationRecord::new("Material", ["316", "304 "]),
            SpecificationRecord::new("Finish", ["2B"]),
            SpecificationRecord::new("Surface", ["2b"]),
        ];
        let kept = dedup_specs(&records);
        let names: Vec<&str> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Grade", "Finish"]);
    }

    #[test]
    fn test_curate_entry_keeps_sentinel() {
        let curator = curator();
        let entry = CommonSpecEntry {
            spec_name: "Finish".to_string(),
            category: String::new(),
            common_options: strings(&["Other"]),
            source_a_unique_options: strings(&["2B", "2b"]),
            source_b_unique_options: Vec::new(),
        };
        let curated = curator.curate_entry(&entry);
        assert_eq!(curated.common_options, strings(&[NO_COMMON_OPTIONS]));
        assert_eq!(curated.source_a_unique_options, strings(&["2B"]));
    }

    #[test]
    fn test_select_buyer_specs() {
        let curator = curator();
        let entry = |name: &str, options: &[&str]| CommonSpecEntry {
            spec_name: name.to_string(),
            category: String::new(),
            common_options: strings(options),
            source_a_unique_options: Vec::new(),
            source_b_unique_options: Vec::new(),
        };
        let common = vec![
            entry("Grade", &["304", "316"]),
            entry("Thickness", &["1 mm", "2 mm"]),
            entry("Finish", &["2B", "Other"]),
            entry("Width", &["1250 mm", "1500 mm"]),
            entry("Sheet Width", &["1250 mm", "1500 mm"]),
            entry("Length", &["2500 mm", "3000 mm"]),
        ];

        let buyers = curator.select_buyer_specs(&common, &strings(&["Material Grade"]));
        let names: Vec<&str> = buyers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Thickness", "Width"]);
    }
}
