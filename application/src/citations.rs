use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn page_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Matches "Page 15", "Pages 28, 32", "page  3" anywhere in the answer,
    // the citation wording the prompt asks the model for.
    PATTERN.get_or_init(|| Regex::new(r"(?i)Pages?\s*([\d,\s]+)").expect("valid citation regex"))
}

/// Page numbers cited in a model answer, deduplicated and ascending.
pub fn cited_pages(answer: &str) -> Vec<u32> {
    let mut pages = BTreeSet::new();
    for capture in page_pattern().captures_iter(answer) {
        for number in capture[1].split(|c: char| !c.is_ascii_digit()) {
            if number.is_empty() {
                continue;
            }
            if let Ok(page) = number.parse::<u32>() {
                pages.insert(page);
            }
        }
    }
    pages.into_iter().collect()
}
