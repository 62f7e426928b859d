pub mod comparison;
pub mod curation;
pub mod matching;
pub mod measure;
pub mod normalizer;
pub mod types;
pub mod vocabulary;

pub const TARGET_MATCHING: &str = "matching";

pub use comparison::{common_options, compare_specs, intersect_options, OptionIntersection};
pub use curation::{dedup_specs, OptionCurator, MAX_BUYER_OPTIONS};
pub use matching::{extract_grade, SpecMatcher};
pub use measure::{Measurement, NumericRange, Unit};
pub use normalizer::SpecNormalizer;
pub use types::{
    CommonSpecEntry, ComparisonResult, ConfigKeySet, SpecificationRecord, Tier, NO_COMMON_OPTIONS,
};
pub use vocabulary::Vocabulary;
