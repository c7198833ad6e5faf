//! Normalized string similarity on a 0-100 scale.
//!
//! `ratio` is the InDel similarity: `200 * LCS / (len(a) + len(b))`, rounded.
//! `partial_ratio` slides the shorter string over the longer one and keeps the
//! best `ratio`, so "docker" scores 100 against "uses docker heavily".
//! Both compare by `char`, not byte, and return 0 when either side is empty.

/// Longest common subsequence length, two-row DP
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let similarity = 200.0 * lcs_len(a, b) as f64 / total as f64;
    similarity.round() as u8
}

/// Similarity of two whole strings
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best similarity of the shorter string against any same-length window of
/// the longer one. Windows hanging off either end are considered too.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let width = short.len();
    let mut best = 0u8;

    let mut consider = |window: &[char]| -> bool {
        best = best.max(ratio_chars(&short, window));
        best == 100
    };

    // Prefix windows shorter than `width`
    for end in 1..width {
        if consider(&long[..end]) {
            return 100;
        }
    }
    // Full-width windows
    for start in 0..=(long.len() - width) {
        if consider(&long[start..start + width]) {
            return 100;
        }
    }
    // Suffix windows shorter than `width`
    for start in (long.len() - width + 1)..long.len() {
        if consider(&long[start..]) {
            return 100;
        }
    }

    best
}
