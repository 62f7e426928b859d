use crate::spec::types::SpecificationRecord;

/// Longest page excerpt placed into a prompt, in characters.
pub const MAX_PAGE_CHARS: usize = 12_000;

// Common text blocks for all prompts
pub const NO_COMMENTARY: &str = r#"
Important instructions for your responses:

1. Do not narrate or describe your actions.
2. Do not summarize or restate the instructions.
3. Do not add explanations before or after the requested output.
4. Use only values that literally appear in the source pages; never invent options.
"#;

pub const IRRELEVANT_SPECS: &str = r#"
Never report specifications about the listing rather than the product: price,
availability, stock, seller or supplier details, delivery, shipping, payment,
packaging, minimum order quantity, warranty or measurement system.
Never report placeholder option values such as "Other", "N/A", "None",
"Select", "Custom" or "Various".
"#;

/// First `MAX_PAGE_CHARS` characters of a page, cut on a character boundary.
pub fn page_excerpt(text: &str) -> String {
    text.trim().chars().take(MAX_PAGE_CHARS).collect()
}

/// Render page texts as numbered source blocks.
pub fn format_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("SOURCE PAGE {}:\n----------\n{}\n----------", i + 1, page_excerpt(page)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render specifications one per line as `Name | Tier | a, b, c`.
pub fn format_specs(specs: &[SpecificationRecord]) -> String {
    specs
        .iter()
        .map(|s| {
            format!(
                "{} | {} | {}",
                s.name,
                s.tier.map(|t| t.to_string()).unwrap_or_default(),
                s.options.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::types::Tier;

    #[test]
    fn test_page_excerpt_is_char_safe() {
        let page = "é".repeat(MAX_PAGE_CHARS + 10);
        assert_eq!(page_excerpt(&page).chars().count(), MAX_PAGE_CHARS);
    }

    #[test]
    fn test_format_specs() {
        let specs = vec![
            SpecificationRecord::new("Grade", ["304", "316"]).with_tier(Tier::Primary),
            SpecificationRecord::new("Finish", ["2B"]),
        ];
        assert_eq!(format_specs(&specs), "Grade | Primary | 304, 316\nFinish |  | 2B");
    }
}
