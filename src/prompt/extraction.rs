use crate::prompt::common::{format_pages, IRRELEVANT_SPECS, NO_COMMENTARY};

/// Prompt asking for a `{config, keys, buyers}` JSON object describing the
/// product specifications found in the given pages.
pub fn json_extraction_prompt(product: &str, pages: &[String]) -> String {
    format!(
        r#"
{pages}

PRODUCT: {product}

TASK: Identify the specifications a buyer must choose when ordering this product.

GUIDELINES:
1. The CONFIG specification is the single attribute that most changes what is
   being bought (for metals this is usually the material grade).
2. KEY specifications are up to 3 further attributes a buyer must select.
3. BUYER specifications are up to 2 optional attributes useful for filtering.
4. Options are the distinct values offered across the pages, as written.
   Keep grade suffixes exactly: "304" and "304L" are different grades.
5. Never repeat a specification's name as one of its own options.
6. At most 8 config options and 6 options per key.
{irrelevant}
RETURN FORMAT (JSON):
{{
  "config": {{ "name": "Grade", "options": ["304", "316"] }},
  "keys": [
    {{ "name": "Finish", "options": ["2B", "BA"] }}
  ],
  "buyers": [
    {{ "name": "Edge", "options": ["Mill", "Slit"] }}
  ]
}}
{no_commentary}
"#,
        pages = format_pages(pages),
        product = product,
        irrelevant = IRRELEVANT_SPECS,
        no_commentary = NO_COMMENTARY,
    )
}

/// Prompt asking for the same specifications in the plain-text section
/// format read by [`crate::text_block::TextBlockParser`].
pub fn text_block_extraction_prompt(product: &str, pages: &[String]) -> String {
    format!(
        r#"
{pages}

PRODUCT: {product}

TASK: Identify the one configuration specification and up to 3 key
specifications a buyer must choose when ordering this product.

Keep grade suffixes exactly: "304" and "304L" are different grades.
At most 8 config options and 6 options per key.
{irrelevant}
RETURN FORMAT (plain text, exactly these headers):
=== CONFIG SPECIFICATION ===
Name: <specification name>
Options: <option> | <option> | <option>

=== KEY SPECIFICATION 1 ===
Name: <specification name>
Options: <option> | <option>

=== KEY SPECIFICATION 2 ===
Name: <specification name>
Options: <option> | <option>

=== KEY SPECIFICATION 3 ===
Name: <specification name>
Options: <option> | <option>

Omit any KEY SPECIFICATION section you cannot fill.
{no_commentary}
"#,
        pages = format_pages(pages),
        product = product,
        irrelevant = IRRELEVANT_SPECS,
        no_commentary = NO_COMMENTARY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_block::CONFIG_HEADER;

    #[test]
    fn test_prompts_carry_product_and_pages() {
        let pages = vec!["Grade: 304, 316".to_string(), "Finish: 2B".to_string()];

        let json = json_extraction_prompt("Stainless Steel Sheet", &pages);
        assert!(json.contains("PRODUCT: Stainless Steel Sheet"));
        assert!(json.contains("SOURCE PAGE 2:\n----------\nFinish: 2B"));
        assert!(json.contains(r#""config": { "name": "Grade""#));

        let text = text_block_extraction_prompt("Stainless Steel Sheet", &pages);
        assert!(text.contains(CONFIG_HEADER));
        assert!(text.contains("Grade: 304, 316"));
    }
}
