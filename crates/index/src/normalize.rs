//! Name normalization
//!
//! Every string that enters or queries the name and word indices passes
//! through [`normalize`], which collapses a raw name to a single canonical
//! token:
//!
//! 1. Trim leading and trailing whitespace
//! 2. Decompose to NFKD and drop combining marks (diacritic stripping)
//! 3. Drop every Unicode punctuation character
//! 4. Drop every remaining whitespace run entirely (no separator survives)
//! 5. Case-fold to lowercase and fold the few Latin letters that do not
//!    decompose to an ASCII base (`ø`, `þ`, `ß`, ...)
//!
//! The result is a contiguous lowercase token with no punctuation and no
//! whitespace, and the function is idempotent: feeding a token back in
//! returns it unchanged. Non-Latin scripts come out lowercased and unmarked
//! but are not transliterated to ASCII; matching stays exact within the
//! script of the source text.

use crate::punct::is_punctuation;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a raw name to its canonical index token
///
/// Pure and total: any string input yields a token, possibly empty. Callers
/// decide whether an empty token is acceptable; the index builders discard
/// them and the word-index query path rejects them.
pub fn normalize(raw: &str) -> String {
    let mut token = String::with_capacity(raw.len());
    for ch in raw.trim().nfkd() {
        if is_combining_mark(ch) || is_punctuation(ch) || ch.is_whitespace() {
            continue;
        }
        for lowered in ch.to_lowercase() {
            match fold_latin(lowered) {
                Some(ascii) => token.push_str(ascii),
                None => token.push(lowered),
            }
        }
    }
    token
}

/// Fold lowercase Latin letters with no NFKD decomposition to an ASCII base
///
/// Also swallows the modifier-letter apostrophes common in romanized
/// Semitic and Polynesian names, which would otherwise survive as stray
/// non-ASCII marks inside tokens.
fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'đ' => "d",
        'ð' => "d",
        'þ' => "th",
        'ß' => "ss",
        'ł' => "l",
        'ħ' => "h",
        'ŋ' => "ng",
        'ı' => "i",
        'ĸ' => "k",
        'ſ' => "s",
        '\u{02BB}' | '\u{02BC}' | '\u{02BD}' | '\u{02BE}' | '\u{02BF}' => "",
        _ => return None,
    };
    Some(folded)
}

// ============================================================================
// Tests
// ============================================================================
