//! Ordered-subsequence fuzzy scoring.

use super::normalize::normalized_chars;

/// Score `pattern` against `text`.
///
/// Both sides are normalized, then `text` is walked once from the left. The
/// pattern cursor advances only on an exact character match and every
/// advance adds 1. If the whole pattern was consumed the accumulated score is
/// returned, otherwise 0.
///
/// The match is greedy and leftmost, not the maximum-scoring alignment.
/// An empty pattern scores 0; callers that treat an empty query as "match
/// everything" must check the query itself, not the score.
pub fn score(pattern: &str, text: &str) -> u32 {
    let pattern = normalized_chars(pattern);
    if pattern.is_empty() {
        return 0;
    }

    let mut cursor = 0usize;
    let mut score = 0u32;
    for c in normalized_chars(text) {
        if c == pattern[cursor] {
            cursor += 1;
            score += 1;
            if cursor == pattern.len() {
                return score;
            }
        }
    }

    0
}
