//! Token-aware similarity scorer (spec §4.3): a RapidFuzz `WRatio`-equivalent
//! built from `strsim`'s Levenshtein/Jaro-Winkler primitives.

fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

/// Normalized Levenshtein similarity scaled to `[0, 100]`.
fn direct_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    let distance = strsim::levenshtein(a, b) as f64;
    let max_len = a.chars().count().max(b.chars().count()) as f64;
    if max_len == 0.0 {
        return 100.0;
    }
    (1.0 - distance / max_len) * 100.0
}

/// Sorts each string's tokens alphabetically before comparing — neutralizes
/// word-order differences ("Phone Samsung" vs "Samsung Phone").
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut a_tokens = tokens(a);
    let mut b_tokens = tokens(b);
    a_tokens.sort_unstable();
    b_tokens.sort_unstable();
    direct_ratio(&a_tokens.join(" "), &b_tokens.join(" "))
}

/// Compares the intersection/union of tokens rather than raw strings —
/// rewards partial containment ("Samsung A54" inside "Samsung Galaxy A54 5G").
fn token_set_ratio(a: &str, b: &str) -> f64 {
    use std::collections::BTreeSet;
    let a_set: BTreeSet<&str> = tokens(a).into_iter().collect();
    let b_set: BTreeSet<&str> = tokens(b).into_iter().collect();

    let intersection: Vec<&str> = a_set.intersection(&b_set).copied().collect();
    let a_diff: Vec<&str> = a_set.difference(&b_set).copied().collect();
    let b_only: Vec<&str> = b_set.difference(&a_set).copied().collect();

    let sorted_intersection = intersection.join(" ");
    let combined_a = format!("{sorted_intersection} {}", a_diff.join(" ")).trim().to_string();
    let combined_b = format!("{sorted_intersection} {}", b_only.join(" ")).trim().to_string();

    direct_ratio(&sorted_intersection, &combined_a)
        .max(direct_ratio(&sorted_intersection, &combined_b))
        .max(direct_ratio(&combined_a, &combined_b))
}

/// Weighted-token similarity in `[0, 100]` (spec §4.3): the maximum of a
/// direct ratio and the token-sort/token-set ratios, so word-order
/// differences and partial containment still score highly.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    direct_ratio(&a, &b).max(token_sort_ratio(&a, &b)).max(token_set_ratio(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity("Samsung Galaxy A54", "Samsung Galaxy A54"), 100.0);
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert_eq!(similarity("  Samsung   A54 ", "samsung a54"), 100.0);
    }

    #[test]
    fn word_order_difference_scores_highly() {
        let score = similarity("Galaxy A54 Samsung", "Samsung Galaxy A54");
        assert!(score >= 95.0, "expected high score for reordered tokens, got {score}");
    }

    #[test]
    fn partial_containment_scores_in_potential_band() {
        let score = similarity("Samsung A54 Phone Black 128", "Samsung Galaxy A54 5G 128GB");
        assert!((50.0..100.0).contains(&score), "got {score}");
    }

    #[test]
    fn unrelated_strings_score_low() {
        let score = similarity("Samsung Galaxy A54", "Apple iPhone 15 Pro");
        assert!(score < 70.0, "got {score}");
    }
}
