/// Keep at most `max_chars` characters from the head of `text`.
///
/// The cut is positional: no word or sentence awareness, and only the start
/// of the document survives. Counting is in Unicode scalar values so the
/// result is always valid UTF-8.
pub fn truncate_context(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
