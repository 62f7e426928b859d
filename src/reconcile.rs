//! End-to-end reconciliation of an authoritative Stage-1 specification list
//! against a second source's extracted bundle.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::common_table::CommonTableParser;
use crate::llm::RawModelResponse;
use crate::recovery::JsonRecovery;
use crate::spec::comparison::compare_specs;
use crate::spec::curation::OptionCurator;
use crate::spec::matching::SpecMatcher;
use crate::spec::types::{CommonSpecEntry, ConfigKeySet, SpecificationRecord};
use crate::spec::vocabulary::Vocabulary;
use crate::text_block::{has_section_header, TextBlockParser};
use crate::TARGET_PARSER;

/// Outcome of reconciling two specification sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub common: Vec<CommonSpecEntry>,
    pub stage1_unique: Vec<SpecificationRecord>,
    pub stage2_unique: Vec<SpecificationRecord>,
    pub buyers: Vec<SpecificationRecord>,
}

impl ReconciliationReport {
    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.stage1_unique.is_empty() && self.stage2_unique.is_empty()
    }
}

/// Holds the matcher, parsers and curator built over one shared vocabulary.
#[derive(Clone)]
pub struct Reconciler {
    matcher: SpecMatcher,
    curator: OptionCurator,
    recovery: JsonRecovery,
    text_block: TextBlockParser,
    table: CommonTableParser,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl Reconciler {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        let matcher = SpecMatcher::new(vocabulary.clone());
        Self {
            curator: OptionCurator::new(matcher.clone()),
            recovery: JsonRecovery::new(),
            text_block: TextBlockParser::new(vocabulary),
            table: CommonTableParser::new(matcher.clone()),
            matcher,
        }
    }

    pub fn with_recovery(mut self, recovery: JsonRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn matcher(&self) -> &SpecMatcher {
        &self.matcher
    }

    pub fn curator(&self) -> &OptionCurator {
        &self.curator
    }

    /// Read a bundle out of a model response in either output format.
    ///
    /// Text carrying any config or key section header goes to the text-block
    /// parser first; JSON recovery runs when there is none or it yields nothing.
    pub fn extract_bundle(&self, response: &RawModelResponse) -> Option<ConfigKeySet> {
        if response.structured().is_none() {
            let text = response.text();
            if has_section_header(&text) {
                if let Some(bundle) = self.text_block.parse(&text) {
                    return Some(bundle);
                }
                debug!(target: TARGET_PARSER, "Text-block header present but nothing parsed, trying JSON");
            }
        }
        self.recovery.recover_bundle(response)
    }

    /// Compare Stage-1 specs with a bundle, curate the shared option lists
    /// and derive buyer specifications from what both sources agree on.
    pub fn reconcile(&self, stage1: &[SpecificationRecord], bundle: &ConfigKeySet) -> ReconciliationReport {
        let stage2 = bundle.records();
        let comparison = compare_specs(&self.matcher, stage1, &stage2);

        let common: Vec<CommonSpecEntry> = comparison
            .common
            .iter()
            .map(|entry| self.curator.curate_entry(entry))
            .collect();

        let taken: Vec<String> = std::iter::once(&bundle.config)
            .chain(bundle.keys.iter())
            .map(|s| s.name.clone())
            .filter(|n| !n.trim().is_empty())
            .collect();
        let buyers = self.curator.select_buyer_specs(&common, &taken);

        info!(
            target: TARGET_PARSER,
            "Reconciled {} Stage-1 and {} Stage-2 spec(s): {} common, {} buyer spec(s)",
            stage1.len(),
            stage2.len(),
            common.len(),
            buyers.len()
        );

        ReconciliationReport {
            common,
            stage1_unique: comparison.unique_a,
            stage2_unique: comparison.unique_b,
            buyers,
        }
    }

    /// Read a common-spec table answer and curate each entry.
    pub fn second_pass(&self, stage1: &[SpecificationRecord], table_text: &str) -> Vec<CommonSpecEntry> {
        self.table
            .parse(table_text, stage1)
            .iter()
            .map(|entry| self.curator.curate_entry(entry))
            .collect()
    }
}
