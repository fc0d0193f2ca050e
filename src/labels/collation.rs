//! Dictionary-style string ordering for label lists.
//!
//! Labels are shown to people, so they are ordered the way a dictionary would
//! order them rather than by code point: case and common Latin accents only
//! break ties. The order is total and independent of the host locale.

use std::cmp::Ordering;

/// Compares two strings in dictionary order.
///
/// Levels, each consulted only when the previous one ties:
/// 1. letters with case and accents removed
/// 2. accents (`e` < `é`)
/// 3. case, uppercase first at the first difference
/// 4. code point order
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_weights(a)
        .cmp(primary_weights(b))
        .then_with(|| lowered(a).cmp(lowered(b)))
        .then_with(|| a.chars().map(case_weight).cmp(b.chars().map(case_weight)))
        .then_with(|| a.cmp(b))
}

/// Lowercased characters of `s`.
fn lowered(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Lowercased characters of `s` with accents folded to their base letter.
fn primary_weights(s: &str) -> impl Iterator<Item = char> + '_ {
    lowered(s).map(fold_accent)
}

/// Uppercase sorts before everything else at the tertiary level.
fn case_weight(c: char) -> u8 {
    u8::from(!c.is_uppercase())
}

/// Maps a lowercase accented Latin letter to its base letter.
const fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}
