//! Collation-aware string comparison for listing sorts.
//!
//! Approximates the behaviour of a locale collator without pulling in ICU
//! data. Strings are compared in three levels:
//!
//! 1. **Primary**: NFKC-folded, lowercased, hiragana folded onto katakana and
//!    with combining marks (accents, dakuten) stripped. `"ｲﾝｽﾀﾝﾄ"`,
//!    `"インスタント"` and `"いんすたんと"` are equal at this level, as are
//!    `"Émile"` and `"emile"`.
//! 2. **Secondary**: the same folding but keeping combining marks, so that
//!    `"カ"` sorts before `"ガ"` and `"e"` before `"é"`.
//! 3. **Tertiary**: raw code points, so distinct strings never compare equal.
//!
//! Because the order is total over distinct strings, sorting ascending and
//! then descending yields exact reverses.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const HIRAGANA_START: u32 = 0x3041;
const HIRAGANA_END: u32 = 0x3096;
const KANA_OFFSET: u32 = 0x60;

/// Compare two strings using the directory collation.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| a.cmp(b))
}

/// Fold a string to its primary collation key.
#[must_use]
pub fn primary_key(s: &str) -> String {
    secondary_key(s)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

fn secondary_key(s: &str) -> String {
    s.nfkc()
        .flat_map(char::to_lowercase)
        .map(fold_kana)
        .collect::<String>()
        .nfc()
        .collect()
}

/// Map hiragana onto the corresponding katakana code point.
fn fold_kana(c: char) -> char {
    let code = u32::from(c);
    if (HIRAGANA_START..=HIRAGANA_END).contains(&code) {
        char::from_u32(code + KANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(primary_key("INSTANT"), primary_key("instant"));
        assert_eq!(compare("apple", "Banana"), Ordering::Less);
        assert_eq!(compare("Banana", "apple"), Ordering::Greater);
    }

    #[test]
    fn test_distinct_strings_never_equal() {
        assert_ne!(compare("abc", "ABC"), Ordering::Equal);
        assert_eq!(compare("abc", "ABC"), compare("ABC", "abc").reverse());
    }

    #[test]
    fn test_kana_folding() {
        assert_eq!(primary_key("いんすたんと"), primary_key("インスタント"));
        assert_eq!(primary_key("ｲﾝｽﾀﾝﾄ"), primary_key("インスタント"));
    }

    #[test]
    fn test_dakuten_is_secondary() {
        // カ < ガ < キ: the voiced mark only breaks ties
        assert_eq!(compare("カ", "ガ"), Ordering::Less);
        assert_eq!(compare("ガ", "キ"), Ordering::Less);
    }

    #[test]
    fn test_accents_are_secondary() {
        assert_eq!(compare("emile", "Émile"), Ordering::Less);
        assert_eq!(compare("Émile", "zoe"), Ordering::Less);
    }

    #[test]
    fn test_full_width_latin_folds() {
        assert_eq!(primary_key("ＦＴＣ"), "ftc");
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(compare("関東", "関東"), Ordering::Equal);
    }
}
