//! Substring heuristics for listing relevance.

/// Number of leading description characters searched for the keyword.
///
/// Sellers of unrelated items often append popular keywords at the end of
/// their descriptions; only a mention near the top counts.
pub const DESCRIPTION_WINDOW: usize = 77;

/// True if `text` contains any blacklist term, case-insensitively.
pub fn contains_blacklisted(text: &str, blacklist: &[String]) -> bool {
    let text = text.to_lowercase();
    blacklist.iter().any(|word| text.contains(&word.to_lowercase()))
}

/// Name check: contains the keyword and none of the blacklist terms.
pub fn name_matches(name: &str, keyword: &str, blacklist: &[String]) -> bool {
    let name = name.to_lowercase();
    name.contains(&keyword.to_lowercase()) && !contains_blacklisted(&name, blacklist)
}

/// Description check: the keyword appears within the first
/// [`DESCRIPTION_WINDOW`] characters and no blacklist term appears anywhere.
pub fn description_matches(description: &str, keyword: &str, blacklist: &[String]) -> bool {
    let description = description.to_lowercase();
    let head: String = description.chars().take(DESCRIPTION_WINDOW).collect();
    head.contains(&keyword.to_lowercase()) && !contains_blacklisted(&description, blacklist)
}
