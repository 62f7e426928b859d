//! Fixed vocabulary tables used by the normalizer, matcher and curation.
//!
//! The built-in tables live in static slices; a [`Vocabulary`] owns a copy of
//! them so callers (and tests) can substitute smaller or domain specific
//! tables at construction time. Iteration order of every table is part of
//! its behavior: the first matching entry wins.

use lazy_static::lazy_static;

// Abbreviation/synonym -> canonical token. Every canonical token is also
// listed as its own key so normalizing a normalized name is a no-op.
pub const NAME_SYNONYMS: &[(&str, &str)] = &[
    ("thk", "thickness"),
    ("thick", "thickness"),
    ("thickness", "thickness"),
    ("dia", "diameter"),
    ("diam", "diameter"),
    ("diameter", "diameter"),
    ("colour", "color"),
    ("color", "color"),
    ("len", "length"),
    ("length", "length"),
    ("wt", "weight"),
    ("weight", "weight"),
    ("wd", "width"),
    ("width", "width"),
    ("matl", "material"),
    ("material", "material"),
    ("grd", "grade"),
    ("grade", "grade"),
    ("std", "standard"),
    ("standard", "standard"),
    ("dimensions", "size"),
    ("dimension", "size"),
    ("size", "size"),
    ("finish", "finish"),
    ("shape", "shape"),
    ("type", "type"),
    ("specification", "specification"),
];

pub const STOP_WORDS: &[&str] = &["sheet", "plate", "pipe", "rod", "bar", "in", "for", "of", "the"];

// Groups of specification-name words that denote the same concept.
// "grade" and "standard" deliberately live in different groups.
pub const NAME_GROUPS: &[&[&str]] = &[
    &["material", "composition", "fabric"],
    &["grade", "quality", "class"],
    &["size", "dimension"],
    &["thickness", "gauge"],
    &["finish", "surface", "coating"],
    &["shape", "profile"],
    &["color", "shade"],
    &["standard", "certification", "compliance"],
    &["length", "long"],
    &["width", "wide", "breadth"],
];

// Alias lists for material grades and designations.
pub const GRADE_ALIASES: &[&[&str]] = &[
    &["304", "ss304", "ss 304", "stainless steel 304", "sus304", "aisi 304"],
    &["304l", "ss304l", "ss 304l", "stainless steel 304l", "sus304l", "aisi 304l"],
    &["316", "ss316", "ss 316", "stainless steel 316", "sus316", "aisi 316"],
    &["316l", "ss316l", "ss 316l", "stainless steel 316l", "sus316l", "aisi 316l"],
    &["202", "ss202", "ss 202", "stainless steel 202"],
    &["201", "ss201", "ss 201", "stainless steel 201"],
    &["430", "ss430", "ss 430", "stainless steel 430"],
    &["ms", "mild steel"],
    &["cs", "carbon steel"],
    &["gi", "galvanized iron", "galvanised iron"],
    &["aluminium", "aluminum"],
];

pub const SHAPE_GROUPS: &[&[&str]] = &[
    &["round", "circular", "circle"],
    &["square", "squared"],
    &["rectangular", "rectangle"],
    &["hexagonal", "hexagon", "hex"],
    &["hot rolled", "hr"],
    &["cold rolled", "cr"],
];

// Option values that carry no information for a buyer.
pub const PLACEHOLDER_OPTIONS: &[&str] = &[
    "other",
    "others",
    "various",
    "etc",
    "misc",
    "miscellaneous",
    "custom",
    "customized",
    "specify",
    "tbd",
    "select",
    "option",
    "options",
    "n/a",
    "na",
    "none",
];

// Specification names that are about the listing rather than the product.
pub const IRRELEVANT_NAME_TERMS: &[&str] = &[
    "measurement system",
    "availability",
    "price",
    "seller",
    "supplier",
    "delivery",
    "shipping",
    "warranty",
    "payment",
    "packaging",
    "minimum order",
    "moq",
    "stock",
];

pub const IRRELEVANT_OPTION_TERMS: &[&str] = &[
    "other",
    "n/a",
    "none",
    "select",
    "not specified",
    "not available",
    "various",
    "custom",
];

/// Immutable tables injected into the normalizer, matcher and curation code.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub name_synonyms: Vec<(String, String)>,
    pub stop_words: Vec<String>,
    pub name_groups: Vec<Vec<String>>,
    pub grade_aliases: Vec<Vec<String>>,
    pub shape_groups: Vec<Vec<String>>,
    pub placeholder_options: Vec<String>,
    pub irrelevant_name_terms: Vec<String>,
    pub irrelevant_option_terms: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn owned_groups(groups: &[&[&str]]) -> Vec<Vec<String>> {
    groups.iter().map(|g| owned(g)).collect()
}

lazy_static! {
    static ref DEFAULT_VOCABULARY: Vocabulary = Vocabulary {
        name_synonyms: NAME_SYNONYMS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        stop_words: owned(STOP_WORDS),
        name_groups: owned_groups(NAME_GROUPS),
        grade_aliases: owned_groups(GRADE_ALIASES),
        shape_groups: owned_groups(SHAPE_GROUPS),
        placeholder_options: owned(PLACEHOLDER_OPTIONS),
        irrelevant_name_terms: owned(IRRELEVANT_NAME_TERMS),
        irrelevant_option_terms: owned(IRRELEVANT_OPTION_TERMS),
    };
}

impl Default for Vocabulary {
    fn default() -> Self {
        DEFAULT_VOCABULARY.clone()
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vocabulary with every table empty; useful as a base for tests.
    pub fn empty() -> Self {
        Vocabulary {
            name_synonyms: Vec::new(),
            stop_words: Vec::new(),
            name_groups: Vec::new(),
            grade_aliases: Vec::new(),
            shape_groups: Vec::new(),
            placeholder_options: Vec::new(),
            irrelevant_name_terms: Vec::new(),
            irrelevant_option_terms: Vec::new(),
        }
    }

    pub fn with_name_synonyms(mut self, synonyms: &[(&str, &str)]) -> Self {
        self.name_synonyms = synonyms
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_stop_words(mut self, words: &[&str]) -> Self {
        self.stop_words = owned(words);
        self
    }

    pub fn with_name_groups(mut self, groups: &[&[&str]]) -> Self {
        self.name_groups = owned_groups(groups);
        self
    }

    pub fn with_grade_aliases(mut self, groups: &[&[&str]]) -> Self {
        self.grade_aliases = owned_groups(groups);
        self
    }

    pub fn with_shape_groups(mut self, groups: &[&[&str]]) -> Self {
        self.shape_groups = owned_groups(groups);
        self
    }

    pub fn with_placeholder_options(mut self, placeholders: &[&str]) -> Self {
        self.placeholder_options = owned(placeholders);
        self
    }

    /// Canonical token for an exact synonym key.
    pub fn canonical(&self, token: &str) -> Option<&str> {
        self.name_synonyms
            .iter()
            .find(|(key, _)| key == token)
            .map(|(_, canonical)| canonical.as_str())
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.iter().any(|w| w == token)
    }

    /// True when a specification name is about the listing, not the product.
    pub fn is_irrelevant_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.irrelevant_name_terms.iter().any(|t| lower.contains(t.as_str()))
    }

    /// True when an option value is a non-answer such as "Other" or "N/A".
    pub fn is_irrelevant_option(&self, option: &str) -> bool {
        let lower = option.trim().to_lowercase();
        lower.is_empty()
            || self
                .irrelevant_option_terms
                .iter()
                .any(|t| lower == *t || lower.contains(t.as_str()))
    }
}
