use tracing::{debug, info};

use super::matching::SpecMatcher;
use super::measure::{Measurement, NumericRange};
use super::types::{CommonSpecEntry, ComparisonResult, SpecificationRecord};
use super::TARGET_MATCHING;

/// Result of intersecting two option lists, with per-index match flags so
/// callers can derive the unique options on each side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionIntersection {
    pub common: Vec<String>,
    pub matched_a: Vec<bool>,
    pub matched_b: Vec<bool>,
}

/// Intersect two option lists, taking values verbatim from `list_a`.
///
/// Discrete values are paired through `options_similar`, each B value being
/// consumed at most once. Remaining B values that parse as a numeric range
/// then absorb every A measurement that falls inside them.
pub fn intersect_options(
    matcher: &SpecMatcher,
    list_a: &[String],
    list_b: &[String],
) -> OptionIntersection {
    let mut result = OptionIntersection {
        common: Vec::new(),
        matched_a: vec![false; list_a.len()],
        matched_b: vec![false; list_b.len()],
    };

    for (i, a) in list_a.iter().enumerate() {
        let hit = list_b
            .iter()
            .enumerate()
            .find(|(j, b)| !result.matched_b[*j] && matcher.options_similar(a, b));
        if let Some((j, _)) = hit {
            result.common.push(a.clone());
            result.matched_a[i] = true;
            result.matched_b[j] = true;
        }
    }

    for (j, b) in list_b.iter().enumerate() {
        if result.matched_b[j] {
            continue;
        }
        let Some(range) = NumericRange::parse(b) else {
            continue;
        };

        for (i, a) in list_a.iter().enumerate() {
            let inside = Measurement::parse(a).is_some_and(|m| range.contains(&m));
            if !inside {
                continue;
            }
            if !result.matched_a[i] {
                debug!(target: TARGET_MATCHING, "Range match: '{}' lies within '{}'", a, b);
                result.common.push(a.clone());
                result.matched_a[i] = true;
            }
            result.matched_b[j] = true;
        }
    }

    result
}

/// Common options of two lists; see [`intersect_options`].
pub fn common_options(matcher: &SpecMatcher, list_a: &[String], list_b: &[String]) -> Vec<String> {
    intersect_options(matcher, list_a, list_b).common
}

/// Options of `own` that were not matched and have no similar counterpart in
/// `other`.
fn unique_options(
    matcher: &SpecMatcher,
    own: &[String],
    matched: &[bool],
    other: &[String],
) -> Vec<String> {
    own.iter()
        .zip(matched)
        .filter(|(value, matched)| {
            !**matched && !other.iter().any(|o| matcher.options_similar(value, o))
        })
        .map(|(value, _)| value.clone())
        .collect()
}

/// Pair specifications of two sets greedily by name.
///
/// Each A record, in input order, binds to the first not-yet-consumed B record
/// with a similar name. A record can bind to at most one record on the other
/// side; this does not search for a maximum matching.
pub fn compare_specs(
    matcher: &SpecMatcher,
    set_a: &[SpecificationRecord],
    set_b: &[SpecificationRecord],
) -> ComparisonResult {
    let mut consumed_b = vec![false; set_b.len()];
    let mut result = ComparisonResult::default();

    for spec_a in set_a {
        let hit = set_b
            .iter()
            .enumerate()
            .find(|(j, spec_b)| !consumed_b[*j] && matcher.names_similar(&spec_a.name, &spec_b.name));

        let Some((j, spec_b)) = hit else {
            result.unique_a.push(spec_a.clone());
            continue;
        };
        consumed_b[j] = true;

        let intersection = intersect_options(matcher, &spec_a.options, &spec_b.options);
        debug!(
            target: TARGET_MATCHING,
            "Matched spec '{}' with '{}': {} common option(s)",
            spec_a.name, spec_b.name, intersection.common.len()
        );

        result.common.push(CommonSpecEntry {
            spec_name: spec_a.name.clone(),
            category: spec_a
                .tier
                .or(spec_b.tier)
                .map(|t| t.to_string())
                .unwrap_or_default(),
            source_a_unique_options: unique_options(
                matcher,
                &spec_a.options,
                &intersection.matched_a,
                &spec_b.options,
            ),
            source_b_unique_options: unique_options(
                matcher,
                &spec_b.options,
                &intersection.matched_b,
                &spec_a.options,
            ),
            common_options: intersection.common,
        });
    }

    result.unique_b = set_b
        .iter()
        .zip(&consumed_b)
        .filter(|(_, consumed)| !**consumed)
        .map(|(spec, _)| spec.clone())
        .collect();

    info!(
        target: TARGET_MATCHING,
        "Compared {} vs {} specs: {} common, {} unique to A, {} unique to B",
        set_a.len(),
        set_b.len(),
        result.common.len(),
        result.unique_a.len(),
        result.unique_b.len()
    );

    result
}
