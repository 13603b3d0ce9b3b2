//! Script normalization for search comparisons.
//!
//! Katakana and hiragana spell the same sounds, so a query typed in one
//! script must find text written in the other. Every katakana letter in
//! U+30A1..=U+30F6 sits exactly `KANA_OFFSET` code points above its hiragana
//! counterpart, which makes the unification a single subtraction.

/// First code point of the remapped (katakana) block.
pub const SECONDARY_START: u32 = 0x30A1;

/// Number of code points in the remapped block (U+30A1..=U+30F6).
pub const SECONDARY_LEN: u32 = 0x56;

/// Distance from a katakana letter down to its hiragana equivalent.
pub const KANA_OFFSET: u32 = 0x60;

/// Map a single katakana letter to hiragana; everything else is returned as-is.
pub fn unify_kana(c: char) -> char {
    let code = c as u32;
    if (SECONDARY_START..SECONDARY_START + SECONDARY_LEN).contains(&code) {
        // The target range U+3041..=U+3096 holds only valid scalar values.
        char::from_u32(code - KANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Case-fold `input` and fold katakana into hiragana.
///
/// Total over all strings and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(input: &str) -> String {
    normalized_chars(input).into_iter().collect()
}

/// Same as [`normalize`], collected into chars for cursor-based scanning.
pub(crate) fn normalized_chars(input: &str) -> Vec<char> {
    input.chars().flat_map(char::to_lowercase).map(unify_kana).collect()
}
