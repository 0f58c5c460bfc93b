//! String similarity scoring for fuzzy intent matching.
//!
//! Combines token-set overlap with normalized edit distance into a
//! single [0, 1] score. Linear in catalog size × utterance length;
//! fast enough that no index is needed for catalogs in the thousands.

use ahash::AHashSet;

/// Similarity between an utterance and a catalog phrasing, in [0, 1].
///
/// Takes the better of whole-string edit similarity and per-token
/// alignment, so both transposed words and in-word typos score well.
pub fn phrase_similarity(input: &str, phrase: &str) -> f64 {
    let input = input.trim().to_lowercase();
    let phrase = phrase.trim().to_lowercase();
    if input.is_empty() || phrase.is_empty() {
        return 0.0;
    }
    if input == phrase {
        return 1.0;
    }

    let whole = edit_similarity(&input, &phrase);
    let tokens = token_alignment(&input, &phrase);
    whole.max(tokens)
}

/// Fraction of phrase tokens that find a close counterpart in the input.
///
/// Each phrase token is scored against its best-matching input token by
/// edit similarity; exact set overlap short-circuits to 1.0 per token.
fn token_alignment(input: &str, phrase: &str) -> f64 {
    let input_tokens: Vec<&str> = input.split_whitespace().collect();
    let phrase_tokens: Vec<&str> = phrase.split_whitespace().collect();
    if input_tokens.is_empty() || phrase_tokens.is_empty() {
        return 0.0;
    }

    let input_set: AHashSet<&str> = input_tokens.iter().copied().collect();

    let mut total = 0.0;
    for pt in &phrase_tokens {
        if input_set.contains(pt) {
            total += 1.0;
            continue;
        }
        let best = input_tokens
            .iter()
            .map(|it| edit_similarity(it, pt))
            .fold(0.0, f64::max);
        total += best;
    }

    total / phrase_tokens.len() as f64
}

/// Normalized edit similarity: 1 − levenshtein / max_len.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Classic two-row Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
