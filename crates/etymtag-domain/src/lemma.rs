//! Lemma key normalization

/// Normalize a lemma into its canonical cache key.
///
/// Keys are trimmed and lower-cased. Diacritics are preserved, so `käima`
/// and `kaima` stay distinct keys. Internal runs of whitespace collapse to
/// a single space so multi-word lemmas have one spelling.
pub fn normalize_lemma(lemma: &str) -> String {
    lemma
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
