use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use super::measure::Measurement;
use super::normalizer::SpecNormalizer;
use super::vocabulary::Vocabulary;
use super::TARGET_MATCHING;

lazy_static! {
    // Trailing material grade such as "304", "304L" or "316Ti"
    static ref GRADE_RE: Regex = Regex::new(r"(?i)(\d+[a-z]*)\s*$").expect("valid grade regex");
}

/// Decides whether two specification names, or two option values, refer to
/// the same real-world concept.
#[derive(Debug, Clone)]
pub struct SpecMatcher {
    normalizer: SpecNormalizer,
}

impl Default for SpecMatcher {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl SpecMatcher {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            normalizer: SpecNormalizer::new(vocabulary),
        }
    }

    pub fn normalizer(&self) -> &SpecNormalizer {
        &self.normalizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.normalizer.vocabulary()
    }

    /// Determine if two specification names denote the same attribute
    pub fn names_similar(&self, a: &str, b: &str) -> bool {
        let norm_a = self.normalizer.normalize(a);
        let norm_b = self.normalizer.normalize(b);

        // Names made only of stop words carry no attribute to compare
        if norm_a.is_empty() || norm_b.is_empty() {
            return !a.trim().is_empty() && a.trim().eq_ignore_ascii_case(b.trim());
        }

        if norm_a == norm_b {
            debug!(target: TARGET_MATCHING, "Exact name match after normalization: '{}' == '{}'", a, b);
            return true;
        }

        if norm_a.contains(norm_b.as_str()) || norm_b.contains(norm_a.as_str()) {
            debug!(target: TARGET_MATCHING, "Containment name match: '{}' ~ '{}'", norm_a, norm_b);
            return true;
        }

        let grouped = self.vocabulary().name_groups.iter().any(|group| {
            group.iter().any(|m| norm_a.contains(m.as_str()))
                && group.iter().any(|m| norm_b.contains(m.as_str()))
        });
        if grouped {
            debug!(target: TARGET_MATCHING, "Synonym group name match: '{}' ~ '{}'", norm_a, norm_b);
        }
        grouped
    }

    /// Determine if two option values denote the same value.
    ///
    /// Material grades that share an alias list are still kept apart when
    /// their trailing grade codes differ, so "304" never matches "304L".
    pub fn options_similar(&self, a: &str, b: &str) -> bool {
        let lower_a = a.trim().to_lowercase();
        let lower_b = b.trim().to_lowercase();

        if lower_a.is_empty() || lower_b.is_empty() {
            return false;
        }

        if lower_a == lower_b || strip_whitespace(&lower_a) == strip_whitespace(&lower_b) {
            return true;
        }

        let measure_a = Measurement::parse(&lower_a);
        let measure_b = Measurement::parse(&lower_b);
        if let (Some(m_a), Some(m_b)) = (measure_a, measure_b) {
            return m_a.approx_eq(&m_b);
        }

        // A value with a unit is a dimension, never a material designation
        let has_unit = |m: Option<Measurement>| m.is_some_and(|m| m.unit.is_some());
        if has_unit(measure_a) || has_unit(measure_b) {
            return false;
        }

        if let Some(shared) = shared_group(&self.vocabulary().grade_aliases, &lower_a, &lower_b) {
            return match (extract_grade(&lower_a), extract_grade(&lower_b)) {
                (Some(grade_a), Some(grade_b)) if !grade_a.eq_ignore_ascii_case(&grade_b) => {
                    debug!(
                        target: TARGET_MATCHING,
                        "Grade guard: '{}' and '{}' share alias list {:?} but grades {} != {}",
                        a, b, shared, grade_a, grade_b
                    );
                    false
                }
                _ => true,
            };
        }

        shared_group(&self.vocabulary().shape_groups, &lower_a, &lower_b).is_some()
    }
}

/// Trailing grade token of a value, e.g. "304L" from "SS 304L".
pub fn extract_grade(value: &str) -> Option<String> {
    GRADE_RE
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// First group that has a member matching each of the two values.
fn shared_group<'a>(groups: &'a [Vec<String>], a: &str, b: &str) -> Option<&'a [String]> {
    groups
        .iter()
        .find(|group| {
            group.iter().any(|m| member_matches(m, a)) && group.iter().any(|m| member_matches(m, b))
        })
        .map(|g| g.as_slice())
}

/// A value belongs to a group member if it equals it, contains it as a
/// complete number when the member carries a digit ("ss304" contains "304",
/// "3040 mm" and "304l" do not), or contains it as whole words ("round bar"
/// contains "round").
fn member_matches(member: &str, value: &str) -> bool {
    if value == member {
        return true;
    }
    if member.chars().any(|c| c.is_ascii_digit()) {
        return value.match_indices(member).any(|(i, _)| {
            let before = value[..i].chars().next_back();
            let after = value[i + member.len()..].chars().next();
            !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_alphanumeric())
        });
    }
    let words: Vec<&str> = value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let member_words: Vec<&str> = member.split_whitespace().collect();
    !member_words.is_empty()
        && words
            .windows(member_words.len())
            .any(|window| window == member_words.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_similar() {
        let matcher = SpecMatcher::default();
        assert!(matcher.names_similar("Thickness", "THK"));
        assert!(matcher.names_similar("Sheet Thickness", "Thickness (mm)"));
        assert!(matcher.names_similar("Material Grade", "Grade"));
        assert!(matcher.names_similar("Material", "Composition"));
        assert!(matcher.names_similar("Grade", "Quality"));
        assert!(matcher.names_similar("Colour", "Shade"));
        assert!(!matcher.names_similar("Thickness", "Width"));
        assert!(!matcher.names_similar("", "Grade"));
    }

    #[test]
    fn test_grade_is_never_standard() {
        let matcher = SpecMatcher::default();
        assert!(!matcher.names_similar("Grade", "Standard"));
        assert!(!matcher.names_similar("Standard", "Grade"));
        assert!(!matcher.names_similar("Quality", "Certification"));
    }

    #[test]
    fn test_options_exact() {
        let matcher = SpecMatcher::default();
        assert!(matcher.options_similar("Hot Rolled", " hot rolled "));
        assert!(matcher.options_similar("IS 2062", "IS2062"));
        assert!(!matcher.options_similar("", ""));
    }

    #[test]
    fn test_grade_guard() {
        let matcher = SpecMatcher::default();
        assert!(!matcher.options_similar("304", "304L"));
        assert!(!matcher.options_similar("SS 316", "316L"));
        assert!(matcher.options_similar("304", "SS304"));
        assert!(matcher.options_similar("ss304", "SS 304"));
        assert!(matcher.options_similar("Stainless Steel 316L", "SS316L"));
        assert!(matcher.options_similar("MS", "Mild Steel"));
        assert!(!matcher.options_similar("304", "316"));
        assert!(!matcher.options_similar("MS", "304"));
    }

    #[test]
    fn test_measurements() {
        let matcher = SpecMatcher::default();
        assert!(matcher.options_similar("2mm", "2.0 mm"));
        assert!(matcher.options_similar("1 inch", "25.4mm"));
        assert!(matcher.options_similar("1 cm", "10 mm"));
        assert!(!matcher.options_similar("1 inch", "25.5mm"));
        assert!(!matcher.options_similar("2 mm", "3 mm"));
    }

    #[test]
    fn test_lengths_are_not_grades() {
        let matcher = SpecMatcher::default();
        assert!(!matcher.options_similar("3040 mm", "304 mm"));
        assert!(!matcher.options_similar("1201 mm", "201 mm"));
        assert!(!matcher.options_similar("3160 mm", "316 mm"));
        assert!(!matcher.options_similar("304 mm", "304L"));
        assert!(!matcher.options_similar("304 mm", "SS 304"));
        assert!(matcher.options_similar("304 mm", "30.4 cm"));
    }

    #[test]
    fn test_alias_member_needs_number_boundary() {
        assert!(member_matches("304", "ss304"));
        assert!(member_matches("304", "ss-304 sheet"));
        assert!(!member_matches("304", "3040"));
        assert!(!member_matches("304", "304l"));
        assert!(!member_matches("201", "1201 mm"));
    }

    #[test]
    fn test_stop_word_only_names() {
        let matcher = SpecMatcher::default();
        assert!(!matcher.names_similar("Pipe", "Sheet"));
        assert!(matcher.names_similar("Sheet", "sheet"));
    }

    #[test]
    fn test_shape_groups() {
        let matcher = SpecMatcher::default();
        assert!(matcher.options_similar("Round", "Circular"));
        assert!(matcher.options_similar("Square", "Squared"));
        assert!(!matcher.options_similar("Round", "Square"));
        // "hr" only counts as a whole word
        assert!(!matcher.options_similar("Hot Rolled", "Three"));
    }

    #[test]
    fn test_extract_grade() {
        assert_eq!(extract_grade("SS 304L"), Some("304l".to_string()));
        assert_eq!(extract_grade("316"), Some("316".to_string()));
        assert_eq!(extract_grade("Mild Steel"), None);
    }

    #[test]
    fn test_substituted_tables() {
        let vocab = Vocabulary::empty().with_shape_groups(&[&["oval", "elliptical"]]);
        let matcher = SpecMatcher::new(Arc::new(vocab));
        assert!(matcher.options_similar("Oval", "Elliptical"));
        assert!(!matcher.options_similar("Round", "Circular"));
    }
}
