//! Normalized name similarity.

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, measured in characters.
///
/// Two empty strings are identical (1.0).
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = edit_distance::edit_distance(a, b);
    1.0 - distance as f64 / max_len as f64
}
