//! URL list loading
//!
//! The list is read once per invocation. Lines are trimmed and blank lines are
//! dropped; order is preserved because it defines row numbering.

use crate::ScrapeError;
use std::path::Path;

/// Reads the newline-delimited URL list at `path`
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Non-blank URLs in file order
/// * `Err(ScrapeError::Input)` - The file could not be read
pub fn load_urls(path: &Path) -> Result<Vec<String>, ScrapeError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScrapeError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let urls = parse_url_list(&content);
    tracing::debug!("Loaded {} URLs from {}", urls.len(), path.display());

    Ok(urls)
}

/// Splits text into trimmed, non-blank URL lines
///
/// No deduplication or URL validation happens here; a malformed line is
/// fetched like any other and reported as a fetch error.
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
