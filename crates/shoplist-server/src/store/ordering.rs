//! Normalized display-name ordering.
//!
//! Lists are stored (blob mode) or returned (relational mode) in an order
//! derived from the item name with leading punctuation stripped, case
//! folded, and Latin-1 diacritics removed. This keeps reads deterministic
//! without an ORDER BY on a volatile column, and sorts "- Leite" where a
//! reader expects "Leite".

use std::cmp::Ordering;

/// Compare two display names under the normalized collation.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// The normalized key a name sorts by.
pub fn sort_key(name: &str) -> String {
    name.trim_start_matches(|c: char| !c.is_alphanumeric() && !c.is_whitespace())
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}
