use std::collections::HashMap;
use std::hash::Hash;

use crate::config::NgramRange;

/// Multiset of every n-gram in a token sequence across an order range.
///
/// N-grams borrow from the source sequence, so two n-grams are equal
/// exactly when their tokens are equal in the same order.
#[derive(Debug, Clone)]
pub struct NgramCounts<'a, T> {
    counts: HashMap<&'a [T], usize>,
    total: usize,
}

fn get_ngrams_of_order<T>(tokens: &[T], n: usize) -> impl Iterator<Item = &[T]> {
    // windows() panics on 0 and yields nothing when n > len
    debug_assert!(n > 0);
    tokens.windows(n)
}

impl<'a, T: Eq + Hash> NgramCounts<'a, T> {
    pub fn extract(tokens: &'a [T], range: &NgramRange) -> Self {
        let mut counts: HashMap<&'a [T], usize> = HashMap::new();
        let mut total = 0;
        for n in range.orders_for(tokens.len()) {
            for ngram in get_ngrams_of_order(tokens, n) {
                *counts.entry(ngram).or_insert(0) += 1;
                total += 1;
            }
        }
        NgramCounts { counts, total }
    }

    /// Total number of n-grams, multiplicities included.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct n-grams.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn get(&self, ngram: &[T]) -> usize {
        self.counts.get(ngram).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a [T], usize)> + '_ {
        self.counts.iter().map(|(ngram, count)| (*ngram, *count))
    }

    /// Size of the multiset intersection, i.e. the sum of clipped counts.
    pub fn overlap(&self, other: &NgramCounts<'_, T>) -> usize {
        // iterate the smaller side
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (&self.counts, &other.counts)
        } else {
            (&other.counts, &self.counts)
        };
        let mut matches: usize = 0;
        for (ng, count) in small {
            if let Some(other_count) = large.get(ng) {
                matches += count.min(other_count);
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(|s| s.to_string()).collect()
    }

    fn range(min_len: usize, max_len: usize) -> NgramRange {
        NgramRange::new(min_len, max_len).unwrap()
    }

    #[test]
    fn test_unigrams() {
        let tokens = words("the cat the");
        let counts = NgramCounts::extract(&tokens, &range(1, 1));
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.distinct(), 2);
        assert_eq!(counts.get(&words("the")), 2);
        assert_eq!(counts.get(&words("cat")), 1);
    }

    #[test]
    fn test_mixed_orders() {
        let tokens = words("a b c");
        let counts = NgramCounts::extract(&tokens, &range(1, 3));
        // 3 unigrams + 2 bigrams + 1 trigram
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get(&words("a b")), 1);
        assert_eq!(counts.get(&words("b a")), 0);
        assert_eq!(counts.get(&words("a b c")), 1);
    }

    #[test]
    fn test_repeated_substrings() {
        let tokens = words("a b a b a b");
        let counts = NgramCounts::extract(&tokens, &range(2, 2));
        assert_eq!(counts.get(&words("a b")), 3);
        assert_eq!(counts.get(&words("b a")), 2);
    }

    #[test]
    fn test_sequence_shorter_than_order() {
        let tokens = words("a b");
        let counts = NgramCounts::extract(&tokens, &range(3, 4));
        assert!(counts.is_empty());
        assert_eq!(counts.distinct(), 0);
    }

    #[test]
    fn test_empty_sequence() {
        let tokens: Vec<String> = vec![];
        let counts = NgramCounts::extract(&tokens, &range(1, 4));
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_huge_max_len() {
        let tokens = words("a b c");
        let counts = NgramCounts::extract(&tokens, &range(1, usize::MAX));
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get(&words("a b c")), 1);
    }

    #[test]
    fn test_non_string_tokens() {
        let tokens = [1u32, 2, 1, 2];
        let counts = NgramCounts::extract(&tokens, &range(2, 2));
        assert_eq!(counts.get(&[1, 2]), 2);
        assert_eq!(counts.get(&[2, 1]), 1);
    }

    #[test]
    fn test_overlap_clips_counts() {
        let pred = words("the the the the");
        let gold = words("the the");
        let pred_counts = NgramCounts::extract(&pred, &range(1, 1));
        let gold_counts = NgramCounts::extract(&gold, &range(1, 1));
        assert_eq!(pred_counts.overlap(&gold_counts), 2);
        assert_eq!(gold_counts.overlap(&pred_counts), 2);
    }

    #[test]
    fn test_overlap_no_match() {
        let pred = words("cats sleep all day");
        let gold = words("the quick brown fox");
        let pred_counts = NgramCounts::extract(&pred, &range(1, 4));
        let gold_counts = NgramCounts::extract(&gold, &range(1, 4));
        assert_eq!(pred_counts.overlap(&gold_counts), 0);
    }

    #[test]
    fn test_iter_sums_to_total() {
        let tokens = words("to be or not to be");
        let counts = NgramCounts::extract(&tokens, &range(1, 2));
        let summed: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(summed, counts.total());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_single_order_total(tokens in proptest::collection::vec(0u8..4, 0..20), n in 1usize..6) {
            let counts = NgramCounts::extract(&tokens, &range(n, n));
            prop_assert_eq!(counts.total(), (tokens.len() + 1).saturating_sub(n));
        }

        #[test]
        fn prop_total_matches_range(tokens in proptest::collection::vec(0u8..4, 0..20), min_len in 1usize..4, extra in 0usize..3) {
            let r = range(min_len, min_len + extra);
            let counts = NgramCounts::extract(&tokens, &r);
            prop_assert_eq!(counts.total(), r.ngram_total(tokens.len()));
        }
    }
}
