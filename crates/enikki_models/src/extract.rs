//! Response-shape normalization.

use crate::{GenerateContentResponse, InlineData, Part};

/// Text carried by a response, wherever it lives.
///
/// Probes in order and returns the first non-blank value, trimmed:
///
/// 1. the direct `text` field;
/// 2. all non-thought text parts of the first candidate, concatenated;
/// 3. the first text part of the first candidate, even if marked as thought.
///
/// # Examples
///
/// ```
/// use enikki_models::{GenerateContentResponse, Part, extract_text};
///
/// let response = GenerateContentResponse::from_parts(vec![
///     Part::text("Hello, "),
///     Part::text("world"),
/// ]);
/// assert_eq!(extract_text(&response).as_deref(), Some("Hello, world"));
///
/// assert_eq!(extract_text(&GenerateContentResponse::default()), None);
/// ```
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let aggregated: String = response
        .first_parts()
        .iter()
        .filter_map(|part| part.as_text())
        .collect();

    let first_part = response.first_parts().iter().find_map(|part| match part {
        Part::Text(text) => Some(text.text.clone()),
        _ => None,
    });

    [response.text.clone(), Some(aggregated), first_part]
        .into_iter()
        .flatten()
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

/// First inline data part of the first candidate.
pub fn first_inline_image(response: &GenerateContentResponse) -> Option<&InlineData> {
    response
        .first_parts()
        .iter()
        .find_map(|part| part.as_inline_data())
}
