use std::hash::Hash;
use std::ops::AddAssign;

use crate::ngram::NgramCounts;

/// Overlap between one hypothesis and one reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub matching: usize,
    pub hyp_total: usize,
    pub ref_total: usize,
}

impl MatchStats {
    pub fn between<T: Eq + Hash>(hyp: &NgramCounts<'_, T>, reference: &NgramCounts<'_, T>) -> Self {
        MatchStats {
            matching: hyp.overlap(reference),
            hyp_total: hyp.total(),
            ref_total: reference.total(),
        }
    }

    /// Denominator used by GLEU: the larger of the two n-gram totals.
    pub fn total(&self) -> usize {
        self.hyp_total.max(self.ref_total)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.matching, self.hyp_total)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.matching, self.ref_total)
    }

    /// `min(precision, recall)`, which is `matching / max(hyp_total, ref_total)`.
    pub fn score(&self) -> f64 {
        ratio(self.matching, self.total())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Running `(matching, total)` sums over a corpus.
///
/// Summing raw counts instead of averaging sentence scores weights long
/// sentences more heavily than short ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusAccumulator {
    matching: usize,
    total: usize,
}

impl CorpusAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stats: &MatchStats) {
        self.matching += stats.matching;
        self.total += stats.total();
    }

    pub fn merge(mut self, other: CorpusAccumulator) -> Self {
        self += other;
        self
    }

    pub fn matching(&self) -> usize {
        self.matching
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn score(self) -> f64 {
        ratio(self.matching, self.total)
    }
}

impl AddAssign for CorpusAccumulator {
    fn add_assign(&mut self, other: CorpusAccumulator) {
        self.matching += other.matching;
        self.total += other.total;
    }
}

impl<'s> FromIterator<&'s MatchStats> for CorpusAccumulator {
    fn from_iter<I: IntoIterator<Item = &'s MatchStats>>(iter: I) -> Self {
        let mut acc = CorpusAccumulator::new();
        for stats in iter {
            acc.add(stats);
        }
        acc
    }
}
