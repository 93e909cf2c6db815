//! Approximate unit matching for "did you mean" suggestions

/// Units scoring above this are suggested
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Default cap on returned suggestions
pub const MAX_SUGGESTIONS: usize = 3;

/// Edit distance with unit cost for substitution, insertion and deletion
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

/// `(max_len - distance) / max_len`, in `[0, 1]`. Two empty strings score 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Up to `max` units similar to `unit`, in the order `all_units` lists them.
/// The input is lowercased first; duplicates are skipped.
pub fn suggest<'a>(unit: &str, all_units: impl IntoIterator<Item = &'a str>, max: usize) -> Vec<String> {
    let unit = unit.to_lowercase();
    let mut matches: Vec<String> = Vec::new();

    for candidate in all_units {
        if matches.len() >= max {
            break;
        }
        if similarity(&unit, candidate) > SIMILARITY_THRESHOLD
            && !matches.iter().any(|m| m == candidate)
        {
            matches.push(candidate.to_string());
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("km", "km"), 0);
        assert_eq!(levenshtein("μm", "um"), 1);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("km", "km"), 1.0);
        assert_eq!(similarity("mille", "mile"), 0.8);
        assert_eq!(similarity("", "km"), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn test_suggest_keeps_scan_order() {
        let units = ["m", "km", "cm", "mm"];
        assert_eq!(suggest("kmm", units, 3), vec!["km", "mm"]);
    }

    #[test]
    fn test_suggest_does_not_rank_by_score() {
        let units = ["kmx", "km"];
        assert_eq!(suggest("km", units, 3), vec!["kmx", "km"]);
        assert_eq!(suggest("km", units, 1), vec!["kmx"]);
    }

    #[test]
    fn test_suggest_respects_max() {
        let units = ["abd", "abe", "abf", "abg"];
        assert_eq!(suggest("abc", units, 3), vec!["abd", "abe", "abf"]);
        assert!(suggest("abc", units, 0).is_empty());
    }

    #[test]
    fn test_suggest_no_duplicates() {
        let units = ["km", "km", "kmh"];
        assert_eq!(suggest("kms", units, 3), vec!["km", "kmh"]);
    }

    #[test]
    fn test_suggest_lowercases_input() {
        assert_eq!(suggest("MILLE", ["mile"], 3), vec!["mile"]);
    }

    #[test]
    fn test_suggest_nothing_for_distant_input() {
        assert!(suggest("kilometerz", ["m", "km", "cm"], 3).is_empty());
        assert!(suggest("", ["m", "km"], 3).is_empty());
    }
}
