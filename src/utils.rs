use std::borrow::Cow;


/// Caps `s` at `max_chars` characters for log output, marking the cut with `...`.
pub fn truncate_for_log(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => Cow::Owned(format!("{}...", &s[..end])),
        None => Cow::Borrowed(s),
    }
}
