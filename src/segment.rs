//! Sentence-boundary document segmenter.
//!
//! Splits raw document text into the ordered, trimmed segments the reuse
//! engine translates one by one. A segment boundary occurs:
//!
//! - after `.`, `!`, or `?` followed by at least one whitespace character
//!   and then an ASCII uppercase letter, or
//! - after a line break followed by optional whitespace and then an ASCII
//!   uppercase letter.
//!
//! Whitespace-only fragments are dropped. The operation is pure: the same
//! input always yields the same sequence. The segmenter never filters by
//! length; callers decide which segments are worth a reuse lookup.

/// Split text into ordered, trimmed, non-empty segments.
pub fn split(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut start = 0usize;

    let mut i = 0usize;
    while i < chars.len() {
        let (offset, c) = chars[i];
        let sentence_end = matches!(c, '.' | '!' | '?');
        if sentence_end || c == '\n' {
            // Scan past the whitespace run following the boundary character.
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            let ws_run = j - (i + 1);
            // Sentence punctuation requires whitespace before the next
            // segment; a line break alone is enough.
            let boundary = j < chars.len()
                && chars[j].1.is_ascii_uppercase()
                && (!sentence_end || ws_run >= 1);
            if boundary {
                push_trimmed(&mut segments, &text[start..offset + c.len_utf8()]);
                start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }

    push_trimmed(&mut segments, &text[start..]);
    segments
}

fn push_trimmed(segments: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}
