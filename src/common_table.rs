use tracing::{debug, info};

use crate::spec::comparison::intersect_options;
use crate::spec::matching::SpecMatcher;
use crate::spec::types::{CommonSpecEntry, SpecificationRecord, Tier, NO_COMMON_OPTIONS};
use crate::TARGET_PARSER;

/// A row of the common-spec table before it is tied to a Stage-1 spec.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub category: String,
    pub options: Vec<String>,
}

/// Parses the pipe-delimited common-specification table produced by the
/// comparison stage and anchors its rows to the authoritative Stage-1 specs.
#[derive(Debug, Clone, Default)]
pub struct CommonTableParser {
    matcher: SpecMatcher,
}

impl CommonTableParser {
    pub fn new(matcher: SpecMatcher) -> Self {
        Self { matcher }
    }

    /// Parse `text` into common entries. Rows whose name matches no Stage-1
    /// spec are dropped; a spec is emitted at most once.
    pub fn parse(&self, text: &str, stage1: &[SpecificationRecord]) -> Vec<CommonSpecEntry> {
        let mut used = vec![false; stage1.len()];
        let mut entries = Vec::new();

        for row in text.lines().filter_map(parse_row) {
            let Some(index) = self.find_stage1(&row.name, stage1) else {
                debug!(target: TARGET_PARSER, "Table row '{}' matches no Stage-1 spec", row.name);
                continue;
            };
            if used[index] {
                debug!(target: TARGET_PARSER, "Duplicate table row for '{}'", stage1[index].name);
                continue;
            }
            used[index] = true;
            entries.push(self.anchor(&row, &stage1[index]));
        }

        info!(
            target: TARGET_PARSER,
            "Parsed {} common spec(s) from table against {} Stage-1 spec(s)",
            entries.len(),
            stage1.len()
        );
        entries
    }

    fn find_stage1(&self, name: &str, stage1: &[SpecificationRecord]) -> Option<usize> {
        stage1
            .iter()
            .position(|s| s.name.trim().eq_ignore_ascii_case(name))
            .or_else(|| {
                stage1
                    .iter()
                    .position(|s| self.matcher.names_similar(&s.name, name))
            })
    }

    // Common values are reported as the Stage-1 literals they correspond to.
    fn anchor(&self, row: &TableRow, spec: &SpecificationRecord) -> CommonSpecEntry {
        let intersection = intersect_options(&self.matcher, &spec.options, &row.options);

        let mut common_options: Vec<String> = Vec::new();
        for value in intersection.common {
            if !common_options.contains(&value) {
                common_options.push(value);
            }
        }
        if common_options.is_empty() {
            common_options.push(NO_COMMON_OPTIONS.to_string());
        }

        let category = if row.category.is_empty() {
            spec.tier.map(|t| t.to_string()).unwrap_or_default()
        } else {
            row.category.clone()
        };

        CommonSpecEntry {
            spec_name: spec.name.clone(),
            category,
            common_options,
            source_a_unique_options: spec
                .options
                .iter()
                .zip(&intersection.matched_a)
                .filter(|(_, matched)| !**matched)
                .map(|(o, _)| o.clone())
                .collect(),
            source_b_unique_options: row
                .options
                .iter()
                .zip(&intersection.matched_b)
                .filter(|(_, matched)| !**matched)
                .map(|(o, _)| o.clone())
                .collect(),
        }
    }
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("specification")
        || lower.trim_start_matches('|').trim().starts_with("specification")
        || lower.contains("stage 1 category")
        || line.chars().all(|c| matches!(c, '|' | '-' | ':' | '=' | '+' | ' ' | '\t'))
}

/// Parse a single table line. Headers, separators and lines without a pipe
/// yield `None`.
pub fn parse_row(line: &str) -> Option<TableRow> {
    let line = line.trim();
    if line.is_empty() || !line.contains('|') || is_header_line(line) {
        return None;
    }

    let fields: Vec<&str> = line
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .collect();

    let (name, category, options_csv) = match fields.as_slice() {
        [name, second] => match Tier::parse(second) {
            Some(tier) => (*name, tier.to_string(), String::new()),
            None => (*name, String::new(), second.to_string()),
        },
        [name, category, rest @ ..] if !rest.is_empty() => {
            (*name, category.to_string(), rest.join(","))
        }
        _ => return None,
    };

    if name.is_empty() {
        return None;
    }

    let options = options_csv
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && !o.to_lowercase().contains("no common options"))
        .map(str::to_string)
        .collect();

    Some(TableRow {
        name: name.to_string(),
        category,
        options,
    })
}
