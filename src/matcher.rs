//! Textual similarity scoring and candidate ranking.
//!
//! Implements the Ratcliff/Obershelp longest-matching-blocks ratio over
//! characters: the score is `2 * M / (len(a) + len(b))` where `M` is the
//! total number of characters covered by recursively-found longest common
//! blocks. Scores fall in `[0.0, 1.0]`; two empty strings score `1.0`.
//!
//! [`find_matches`] ranks a candidate list against a query with a minimum
//! threshold. Ties keep candidate order (stable sort, no secondary key) —
//! reuse decisions depend on this ordering being reproducible.

use std::collections::HashMap;

/// Similarity ratio between two strings in `[0.0, 1.0]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let matched = matching_chars(&a, &b);
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

/// Score `candidates` against `query`, keep scores `>= threshold`, and
/// return `(candidate_index, score)` pairs sorted descending by score.
/// Equal scores preserve candidate order.
pub fn find_matches(query: &str, candidates: &[&str], threshold: f64) -> Vec<(usize, f64)> {
    let mut matches: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, similarity(query, c)))
        .filter(|(_, score)| *score >= threshold)
        .collect();
    // Vec::sort_by is stable, so ties keep store order.
    matches.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

/// Total characters covered by the longest matching blocks of `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut regions = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size > 0 {
            total += size;
            regions.push((alo, i, blo, j));
            regions.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest matching block of `a[alo..ahi]` and `b[blo..bhi]`, as
/// `(a_start, b_start, length)`. Earliest block in `a` wins ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate().take(bhi).skip(blo) {
        b_positions.entry(c).or_default().push(j);
    }

    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0;
    // run_lengths[j] = length of the common run ending at a[i - 1], b[j]
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_positions.get(&a[i]) {
            for &j in positions {
                let k = if j > blo {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next_runs.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_lengths = next_runs;
    }

    (best_i, best_j, best_size)
}
