//! Text preprocessing before embedding generation

use tracing::debug;

use crate::errors::CourseScoutError;
use crate::errors::Result;

/// Normalize query text for embedding.
///
/// Collapses newlines, tabs and runs of spaces into single spaces and drops
/// control characters. Equal queries modulo whitespace embed identically.
pub fn preprocess_text_for_embedding(text: &str) -> Result<String> {
    let sanitized = sanitize_text(&normalize_whitespace(text));

    if sanitized.is_empty() {
        return Err(CourseScoutError::InvalidRequest(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    debug!(
        "Preprocessed text: {} -> {} chars",
        text.len(),
        sanitized.len()
    );
    Ok(sanitized)
}

/// Normalize whitespace and newlines
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Replace control characters, then collapse the spaces they leave behind
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
