use crate::prompt::common::{format_specs, NO_COMMENTARY};
use crate::spec::types::{SpecificationRecord, NO_COMMON_OPTIONS};

/// Prompt asking which Stage-2 specifications correspond to the
/// authoritative Stage-1 list, answered as a pipe-delimited table.
pub fn common_table_prompt(stage1: &[SpecificationRecord], stage2: &[SpecificationRecord]) -> String {
    format!(
        r#"
STAGE 1 SPECIFICATIONS (authoritative, Name | Category | Options):
----------
{stage1}
----------

STAGE 2 SPECIFICATIONS (Name | Category | Options):
----------
{stage2}
----------

TASK: For every Stage 1 specification that also appears in Stage 2 (possibly
under a different name or abbreviation), list the option values both stages share.

GUIDELINES:
1. Use the Stage 1 specification name and category exactly as written.
2. Treat equal measurements in different units as shared ("1 inch" and "25.4 mm").
3. A Stage 1 value inside a Stage 2 range is shared ("1.0 mm" within "0.5-2 mm").
4. Grade suffixes matter: "304" and "304L" are NOT shared.
5. If a specification matches but shares nothing, write "{none}".

RETURN FORMAT (plain text table, one row per matched specification):
Specification | Stage 1 Category | Common Options
Grade | Primary | 304, 316
{no_commentary}
"#,
        stage1 = format_specs(stage1),
        stage2 = format_specs(stage2),
        none = NO_COMMON_OPTIONS,
        no_commentary = NO_COMMENTARY,
    )
}
