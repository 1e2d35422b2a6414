// crates/geoadmin-core/src/text.rs

//! Text helpers shared by validation, duplicate checks and table search.

/// Latin letters that carry a diacritic (Latin-1 through Latin Extended-B,
/// plus Latin Extended Additional).
fn is_accented_latin(c: char) -> bool {
    c.is_alphabetic() && matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

/// Key for the table search: lowercase, with diacritics stripped from Latin
/// letters (`Concepción` -> `concepcion`, `Łódź` -> `lodz`).
///
/// Other scripts are only lowercased, never transliterated, so a match is
/// always a substring of the lowercased name (`м` does not find `Miraflores`).
/// Duplicate detection is stricter, see [`name_key`].
pub fn search_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(c) {
            continue;
        }
        match deunicode::deunicode_char(c) {
            Some(base) if is_accented_latin(c) && base.len() == 1 => {
                key.push_str(&base.to_ascii_lowercase());
            }
            _ => key.push(c),
        }
    }
    key
}

/// Key used for duplicate detection: trimmed and lowercased, accents kept.
///
/// `"  Centro "` and `"centro"` collide, `"Biobio"` and `"Biobío"` do not.
pub fn name_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Case-insensitive, trimmed equality.
pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Combining diacritical marks, so decomposed input (`e` + U+0301) passes too.
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// A valid name is non-empty after trimming and made of letters and
/// whitespace only. Letters of any script count (`ñ`, `ü`, `ø`, `Ł`, `д`).
///
/// ```
/// use geoadmin_core::text::is_valid_name;
///
/// assert!(is_valid_name("  San José "));
/// assert!(is_valid_name("Łódź"));
/// assert!(!is_valid_name("Peru2"));
/// assert!(!is_valid_name("Saint-Denis"));
/// assert!(!is_valid_name("   "));
/// ```
pub fn is_valid_name(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || is_combining_mark(c))
}
