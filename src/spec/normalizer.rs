use std::sync::Arc;
use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use super::vocabulary::Vocabulary;
use super::TARGET_MATCHING;

// Substring fallback ignores very short tokens and keys ("a" would otherwise
// map to "material").
const MIN_FALLBACK_LEN: usize = 3;

/// Canonicalizes free-text specification names into comparable token strings.
#[derive(Debug, Clone)]
pub struct SpecNormalizer {
    vocabulary: Arc<Vocabulary>,
}

impl Default for SpecNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl SpecNormalizer {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Normalize a specification name.
    ///
    /// Lower-cases, replaces `()-_,.;` with spaces, drops stop words, maps each
    /// token through the synonym table and removes repeated tokens. Never
    /// fails; the empty string normalizes to the empty string.
    pub fn normalize(&self, name: &str) -> String {
        let cleaned = basic_normalize(name);

        let mut tokens: Vec<String> = Vec::new();
        for token in cleaned.split_whitespace() {
            if self.vocabulary.is_stop_word(token) {
                continue;
            }
            let mapped = self.map_token(token);
            if !tokens.iter().any(|t| *t == mapped) {
                tokens.push(mapped);
            }
        }

        let normalized = tokens.join(" ");
        trace!(target: TARGET_MATCHING, "Normalized '{}' to '{}'", name, normalized);
        normalized
    }

    fn map_token(&self, token: &str) -> String {
        if let Some(canonical) = self.vocabulary.canonical(token) {
            return canonical.to_string();
        }

        if token.chars().count() < MIN_FALLBACK_LEN || token.chars().all(|c| c.is_ascii_digit()) {
            return token.to_string();
        }

        // First key contained in the token (or containing it) wins
        self.vocabulary
            .name_synonyms
            .iter()
            .filter(|(key, _)| key.chars().count() >= MIN_FALLBACK_LEN)
            .find(|(key, _)| token.contains(key.as_str()) || key.contains(token))
            .map(|(_, canonical)| canonical.clone())
            .unwrap_or_else(|| token.to_string())
    }
}

/// Lower-case, NFKC-fold and replace name punctuation with single spaces.
fn basic_normalize(name: &str) -> String {
    name.nfkc()
        .collect::<String>()
        .to_lowercase()
        .replace(['(', ')', '-', '_', ',', '.', ';'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        let normalizer = SpecNormalizer::default();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   "), "");
        assert_eq!(normalizer.normalize("Sheet Thickness (mm)"), "thickness mm");
        assert_eq!(normalizer.normalize("THK"), "thickness");
        assert_eq!(normalizer.normalize("Pipe Dia."), "diameter");
        assert_eq!(normalizer.normalize("Colour"), "color");
    }

    #[test]
    fn test_stop_words_and_duplicates() {
        let normalizer = SpecNormalizer::default();
        assert_eq!(normalizer.normalize("Thickness of the Plate"), "thickness");
        assert_eq!(normalizer.normalize("thk thickness"), "thickness");
        assert_eq!(normalizer.normalize("Size in MM"), "size mm");
    }

    #[test]
    fn test_substring_fallback() {
        let normalizer = SpecNormalizer::default();
        assert_eq!(normalizer.normalize("Thicknesses"), "thickness");
        assert_eq!(normalizer.normalize("Materials"), "material");
        // Short and numeric tokens pass through untouched
        assert_eq!(normalizer.normalize("OD 25"), "od 25");
    }

    #[test]
    fn test_unmapped_tokens_pass_through() {
        let normalizer = SpecNormalizer::default();
        assert_eq!(normalizer.normalize("Surface Finish"), "surface finish");
        assert_eq!(normalizer.normalize("Brand_Name"), "brand name");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = SpecNormalizer::default();
        let samples = [
            "Sheet Thickness (mm)",
            "Material Grade",
            "Pipe Dia.",
            "Outer Dia (OD)",
            "Colour/Shade",
            "Standard; Grade",
            "Thicknesses of plates",
            "Dimensions - L x W",
            "Type of Finish",
            "ｗｉｄｔｈ",
            "",
        ];
        for sample in samples {
            let once = normalizer.normalize(sample);
            assert_eq!(normalizer.normalize(&once), once, "input: {sample}");
        }
    }

    #[test]
    fn test_substituted_vocabulary() {
        let vocab = Vocabulary::empty().with_name_synonyms(&[("ht", "height"), ("height", "height")]);
        let normalizer = SpecNormalizer::new(Arc::new(vocab));
        assert_eq!(normalizer.normalize("HT"), "height");
        // "sheet" is only a stop word in the default tables
        assert_eq!(normalizer.normalize("Sheet HT"), "sheet height");
    }
}
