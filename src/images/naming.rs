// src/images/naming.rs
// =============================================================================
// Derives a file name for each image from its alt text.
//
// Rules:
// - commas, periods and forward slashes are removed
// - runs of whitespace become a single underscore
// - the result is cut to 30 characters
// - alt text of 0 or 1 characters (or nothing left after cleaning) means the
//   image is "unnamed" and gets unnamed_img_<ordinal> instead
// - every name ends in .jpeg
//
// Example:
//   "fighter jet/ no. 1, best in Texas" -> "fighter_jet_no_1_best_in_Texas.jpeg"
// =============================================================================

use serde::Serialize;

/// Extension appended to every derived name.
pub const IMAGE_EXTENSION: &str = ".jpeg";

const MAX_NAME_CHARS: usize = 30;

/// One image reference found while crawling.
///
/// The file name is derived once, in `new`, and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub url: String,
    pub alt_text: String,
    pub file_name: String,
    /// Set only for images whose alt text was too short to use
    pub unnamed_ordinal: Option<usize>,
}

impl ImageRecord {
    pub fn new(
        url: impl Into<String>,
        alt_text: impl Into<String>,
        unnamed_ordinal: Option<usize>,
    ) -> Self {
        let alt_text = alt_text.into();
        let file_name = name_for(&alt_text, unnamed_ordinal.unwrap_or_default());
        Self {
            url: url.into(),
            alt_text,
            file_name,
            unnamed_ordinal,
        }
    }
}

/// Build the file name for an image. Pure: same input, same name.
pub fn name_for(alt_text: &str, ordinal_if_unnamed: usize) -> String {
    let stem = clean_alt_text(alt_text)
        .unwrap_or_else(|| format!("unnamed_img_{ordinal_if_unnamed}"));
    format!("{stem}{IMAGE_EXTENSION}")
}

/// True when `alt_text` cannot be used as a name and an ordinal is needed.
pub fn is_unnamed(alt_text: &str) -> bool {
    clean_alt_text(alt_text).is_none()
}

fn clean_alt_text(alt_text: &str) -> Option<String> {
    if alt_text.chars().count() <= 1 {
        return None;
    }

    let stripped: String = alt_text
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '/'))
        .collect();

    // split_whitespace drops leading/trailing runs too, so no stray underscores
    let joined = stripped.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(MAX_NAME_CHARS).collect();

    if truncated.is_empty() {
        None
    } else {
        Some(truncated)
    }
}
