//! Partial-ratio string similarity
//!
//! Scores how well the shorter string aligns with some substring of the
//! longer one, as an integer 0–100. Every comparison in the pipeline uses
//! the same threshold: a pair matches when its score exceeds
//! [`MATCH_THRESHOLD`].
//!
//! Window scoring uses normalized indel similarity, `2·LCS / (|a| + |b|)`.
//! Besides every full-length window of the longer string, the prefix and
//! suffix windows shorter than the needle are scored too, so a needle that
//! hangs off either end of the haystack still aligns ("indin" vs "indian").

/// Score a pair must exceed to count as a fuzzy match
pub const MATCH_THRESHOLD: u8 = 80;

/// Partial ratio between two strings, 0–100. Either side empty scores 0.
///
/// Callers pass already-normalized text (see [`super::normalize`]).
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (needle, haystack) = if a.len() <= b.len() {
        (&a[..], &b[..])
    } else {
        (&b[..], &a[..])
    };
    let n = needle.len();
    let m = haystack.len();

    let mut best = 0.0f64;

    for start in 0..=(m - n) {
        best = best.max(indel_similarity(needle, &haystack[start..start + n]));
        if best >= 1.0 {
            return 100;
        }
    }

    // Windows overhanging the start of the haystack
    for end in 1..n {
        best = best.max(indel_similarity(needle, &haystack[..end]));
    }

    // Windows overhanging the end of the haystack
    for start in (m - n + 1)..m {
        best = best.max(indel_similarity(needle, &haystack[start..]));
    }

    (best * 100.0).round() as u8
}

/// True when `partial_ratio(a, b)` exceeds `threshold`
pub fn is_fuzzy_match(a: &str, b: &str, threshold: u8) -> bool {
    partial_ratio(a, b) > threshold
}

fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Longest common subsequence length, single-row DP
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_lcs_len() {
        assert_eq!(lcs_len(&chars("indin"), &chars("india")), 4);
        assert_eq!(lcs_len(&chars("abc"), &chars("xyz")), 0);
        assert_eq!(lcs_len(&chars("peanut"), &chars("peanut")), 6);
    }

    #[test]
    fn test_identical_and_contained() {
        assert_eq!(partial_ratio("onion", "onion"), 100);
        assert_eq!(partial_ratio("garlic", "garlic cloves"), 100);
        assert_eq!(partial_ratio("peanut butter", "peanut"), 100);
        assert_eq!(partial_ratio("indi", "indian"), 100);
    }

    #[test]
    fn test_overhanging_needle() {
        // best alignment is "indi" against the needle "indin"
        assert_eq!(partial_ratio("indin", "indian"), 89);
        assert!(is_fuzzy_match("indin", "indian", MATCH_THRESHOLD));
    }

    #[test]
    fn test_unrelated_strings() {
        assert!(partial_ratio("peanut", "tomato") < MATCH_THRESHOLD);
        assert!(!is_fuzzy_match("cashew", "rice", MATCH_THRESHOLD));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // best window is the full string, LCS "abde"
        assert_eq!(partial_ratio("abcde", "abxde"), 80);
        assert!(!is_fuzzy_match("abcde", "abxde", 80));
        assert!(is_fuzzy_match("abcde", "abxde", 79));
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(partial_ratio("", "onion"), 0);
        assert_eq!(partial_ratio("onion", ""), 0);
    }
}
