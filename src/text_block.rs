use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::recovery::{MAX_CONFIG_OPTIONS, MAX_KEY_OPTIONS};
use crate::spec::types::{ConfigKeySet, SpecificationRecord, MAX_KEYS};
use crate::spec::vocabulary::Vocabulary;
use crate::TARGET_PARSER;

/// Header that opens the config section of a text-block response.
pub const CONFIG_HEADER: &str = "=== CONFIG SPECIFICATION ===";

fn section_regex(header: &str) -> Regex {
    let pattern = format!(
        r"(?i)===\s*{}\s*===\s*Name:[ \t]*([^\n]+?)[ \t]*\r?\n\s*Options:[ \t]*([^\n]*)",
        header
    );
    Regex::new(&pattern).expect("valid section regex")
}

lazy_static! {
    static ref SECTION_HEADER_RE: Regex =
        Regex::new(r"(?i)===\s*(?:CONFIG|KEY)\s+SPECIFICATION").expect("valid header regex");
    static ref CONFIG_RE: Regex = section_regex("CONFIG SPECIFICATION");
    static ref KEY_RES: Vec<Regex> = (1..=MAX_KEYS)
        .map(|n| section_regex(&format!(r"KEY SPECIFICATION\s*{}", n)))
        .collect();
}

/// True when `text` carries at least one config or key section header.
pub fn has_section_header(text: &str) -> bool {
    SECTION_HEADER_RE.is_match(text)
}

/// Parses the plain-text section format:
///
/// ```text
/// === CONFIG SPECIFICATION ===
/// Name: Grade
/// Options: 304 | 316 | 202
///
/// === KEY SPECIFICATION 1 ===
/// Name: Finish
/// Options: 2B | BA
/// ```
#[derive(Debug, Clone)]
pub struct TextBlockParser {
    vocabulary: Arc<Vocabulary>,
}

impl Default for TextBlockParser {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl TextBlockParser {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Extract whatever sections are present and relevant. Returns `None`
    /// only when neither a config nor any key survives the filters.
    pub fn parse(&self, text: &str) -> Option<ConfigKeySet> {
        let config = self.section(&CONFIG_RE, text, MAX_CONFIG_OPTIONS);
        let keys: Vec<SpecificationRecord> = KEY_RES
            .iter()
            .filter_map(|re| self.section(re, text, MAX_KEY_OPTIONS))
            .collect();

        if config.is_none() && keys.is_empty() {
            debug!(target: TARGET_PARSER, "No usable sections in text-block response");
            return None;
        }

        let bundle = ConfigKeySet {
            config: config.unwrap_or_else(|| SpecificationRecord::new::<String>("", [])),
            keys,
            buyers: Vec::new(),
        };
        info!(
            target: TARGET_PARSER,
            "Parsed text block: config '{}', {} key(s)",
            bundle.config.name,
            bundle.keys.len()
        );
        Some(bundle)
    }

    fn section(&self, re: &Regex, text: &str, cap: usize) -> Option<SpecificationRecord> {
        let caps = re.captures(text)?;
        let name = caps.get(1)?.as_str().trim();
        if name.is_empty() || self.vocabulary.is_irrelevant_name(name) {
            debug!(target: TARGET_PARSER, "Skipping section '{}'", name);
            return None;
        }

        let options: Vec<String> = caps
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split('|')
            .map(str::trim)
            .filter(|o| !o.is_empty() && !self.vocabulary.is_irrelevant_option(o))
            .take(cap)
            .map(str::to_string)
            .collect();

        if options.is_empty() {
            debug!(target: TARGET_PARSER, "Section '{}' has no relevant options", name);
            return None;
        }
        Some(SpecificationRecord::new(name, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "=== CONFIG SPECIFICATION ===
Name: Grade
Options: 304 | 316 | 202 | Other

=== KEY SPECIFICATION 1 ===
Name: Finish
Options: 2B | BA | No. 4 | HL | Mirror | 8K | Matt

=== KEY SPECIFICATION 2 ===
Name: Thickness
Options: 0.5 mm | 1 mm

=== KEY SPECIFICATION 3 ===
Name: Standard
Options: ASTM A240
";

    #[test]
    fn test_full_response() {
        let bundle = TextBlockParser::default().parse(FULL).unwrap();
        assert_eq!(bundle.config.name, "Grade");
        assert_eq!(bundle.config.options, vec!["304", "316", "202"]);
        assert_eq!(bundle.keys.len(), 3);
        assert_eq!(bundle.keys[0].name, "Finish");
        assert_eq!(bundle.keys[0].options.len(), MAX_KEY_OPTIONS);
        assert_eq!(bundle.keys[1].options, vec!["0.5 mm", "1 mm"]);
        assert_eq!(bundle.keys[2].name, "Standard");
        assert!(bundle.buyers.is_empty());
    }

    #[test]
    fn test_partial_response_is_kept() {
        let text = "=== KEY SPECIFICATION 2 ===\nName: Width\nOptions: 1250 mm | 1500 mm\n";
        let bundle = TextBlockParser::default().parse(text).unwrap();
        assert!(bundle.config.name.is_empty());
        assert_eq!(bundle.keys.len(), 1);
        assert_eq!(bundle.keys[0].name, "Width");
    }

    #[test]
    fn test_irrelevant_sections_are_rejected() {
        let text = "=== CONFIG SPECIFICATION ===
Name: Price Range
Options: 100-200 | 200-300

=== KEY SPECIFICATION 1 ===
Name: Color
Options: Other | N/A | None
";
        assert!(TextBlockParser::default().parse(text).is_none());
    }

    #[test]
    fn test_config_options_are_capped() {
        let text = "=== CONFIG SPECIFICATION ===\nName: Size\nOptions: 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10\n";
        let bundle = TextBlockParser::default().parse(text).unwrap();
        assert_eq!(bundle.config.options.len(), MAX_CONFIG_OPTIONS);
        assert_eq!(bundle.config.options[7], "8");
    }

    #[test]
    fn test_section_header_detection() {
        assert!(has_section_header(FULL));
        assert!(has_section_header("=== key specification 2 ===\nName: Width"));
        assert!(!has_section_header("{\"config\": {\"name\": \"Grade\"}}"));
    }

    #[test]
    fn test_no_sections() {
        assert!(TextBlockParser::default().parse("Grade: 304, 316").is_none());
        assert!(TextBlockParser::default().parse("").is_none());
    }
}
