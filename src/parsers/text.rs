//! Text normalization shared by the listing and detail parsers

/// Collapses every run of whitespace into a single space and trims the ends
///
/// Used for link titles and excerpts, where markup often splits one
/// visible phrase across several text nodes and indented lines.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins text blocks with newlines, trimming each block and dropping empty ones
pub fn join_blocks<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    blocks
        .into_iter()
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
