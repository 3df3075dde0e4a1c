//! Splitting long text into message-sized chunks.

/// Discord's message length ceiling, in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Split `text` into chunks of at most `limit` characters.
///
/// Each cut prefers, in order:
///
/// 1. the last newline within the first `limit + 1` characters, unless it
///    falls in the first half of that window;
/// 2. the last space in the window;
/// 3. a hard cut after `limit` characters.
///
/// A break point at position 0 is never used, so every chunk is non-empty.
/// Leading whitespace of the remainder is dropped after each cut. Lengths
/// count Unicode scalar values and cuts always land on character boundaries.
///
/// # Examples
///
/// ```
/// use enikki_social::split_message;
///
/// let chunks = split_message("hello world foo", 11);
/// assert_eq!(chunks, vec!["hello world", "foo"]);
///
/// assert!(split_message("", 2000).is_empty());
/// ```
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.chars().count() <= limit {
            chunks.push(remaining.to_string());
            break;
        }

        let cut = split_point(remaining, limit);
        let (chunk, rest) = remaining.split_at(cut);
        chunks.push(chunk.to_string());
        remaining = rest.trim_start();
    }

    chunks
}

/// Byte offset to cut `text` at; `text` is longer than `limit` chars.
fn split_point(text: &str, limit: usize) -> usize {
    // Window covers char indices 0..=limit.
    let window: Vec<(usize, char)> = text.char_indices().take(limit + 1).collect();

    let last = |needle: char| {
        window
            .iter()
            .enumerate()
            .rev()
            .find(|(_, (_, c))| *c == needle)
            .map(|(char_index, (byte_index, _))| (char_index, *byte_index))
    };

    let newline = last('\n').filter(|(char_index, _)| *char_index > 0 && char_index * 2 >= limit);
    let space = || last(' ').filter(|(char_index, _)| *char_index > 0);

    if let Some((_, byte_index)) = newline.or_else(space) {
        return byte_index;
    }

    window
        .get(limit)
        .map(|(byte_index, _)| *byte_index)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hello", 2000), vec!["hello"]);
    }

    #[test]
    fn prefers_newline_in_second_half() {
        let text = format!("{}\n{}", "a".repeat(8), "b".repeat(8));
        assert_eq!(split_message(&text, 10), vec!["a".repeat(8), "b".repeat(8)]);
    }

    #[test]
    fn newline_too_early_falls_back_to_space() {
        let text = "ab\ncd efgh ijklmnop";
        // newline at index 2 is in the first half of a 10-char window
        assert_eq!(split_message(text, 10)[0], "ab\ncd efgh");
    }

    #[test]
    fn no_break_point_hard_cuts() {
        let text = "x".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn leading_space_is_not_a_break_point() {
        let text = format!(" {}", "y".repeat(12));
        let chunks = split_message(&text, 10);
        assert_eq!(chunks[0].chars().count(), 10);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn cuts_on_char_boundaries() {
        let text = "あ".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn break_at_exact_limit_is_used() {
        let text = format!("{} {}", "a".repeat(10), "b".repeat(3));
        assert_eq!(split_message(&text, 10), vec!["a".repeat(10), "b".repeat(3)]);
    }
}
