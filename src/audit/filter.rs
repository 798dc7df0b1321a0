use crate::core::Tag;

/// True if any tag key or value contains any exclusion token as a
/// case-insensitive substring. Excluded resources are dropped before
/// discovery and never appear in a section, not even as error rows.
pub fn is_excluded(tags: &[Tag], tokens: &[String]) -> bool {
    tags.iter().any(|tag| {
        let key = tag.key.to_ascii_lowercase();
        let value = tag.value.to_ascii_lowercase();
        tokens
            .iter()
            .map(|t| t.to_ascii_lowercase())
            .any(|token| !token.is_empty() && (key.contains(&token) || value.contains(&token)))
    })
}
