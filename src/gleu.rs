use std::hash::Hash;

use tracing::{debug, warn};

use crate::config::NgramRange;
use crate::ngram::NgramCounts;
use crate::stats::{CorpusAccumulator, MatchStats};

/// Picks the reference the hypothesis matches best.
///
/// A reference scores `matching / max(hyp_total, ref_total)`; the first
/// reference with the highest score wins ties. References whose combined
/// total is zero are not candidates, so `None` means nothing was comparable.
pub fn best_match<T, R>(
    hypothesis: &[T],
    references: &[R],
    range: &NgramRange,
) -> Option<MatchStats>
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    if references.is_empty() {
        warn!("hypothesis has no references; scoring it as 0");
        return None;
    }
    if hypothesis.len() < range.min_len() {
        debug!(
            len = hypothesis.len(),
            min_len = range.min_len(),
            "hypothesis shorter than min_len yields no n-grams"
        );
    }

    let hyp_counts = NgramCounts::extract(hypothesis, range);
    let mut best: Option<MatchStats> = None;
    for reference in references {
        let reference = reference.as_ref();
        if reference.len() < range.min_len() {
            debug!(
                len = reference.len(),
                min_len = range.min_len(),
                "reference shorter than min_len yields no n-grams"
            );
        }
        let ref_counts = NgramCounts::extract(reference, range);
        let stats = MatchStats::between(&hyp_counts, &ref_counts);
        if stats.total() == 0 {
            continue;
        }
        // strict comparison keeps the earliest reference on ties
        if best.map_or(true, |current| stats.score() > current.score()) {
            best = Some(stats);
        }
    }
    best
}

/// GLEU score of one hypothesis against its references, in `[0, 1]`.
pub fn sentence_gleu<T, R>(hypothesis: &[T], references: &[R], range: &NgramRange) -> f64
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    best_match(hypothesis, references, range)
        .map(|stats| stats.score())
        .unwrap_or(0.0)
}

/// Corpus GLEU: the best reference's counts are summed over every pair and
/// divided once at the end, rather than averaging sentence scores.
///
/// `hypotheses` and `list_of_references` are zipped; callers validate that
/// their lengths agree.
pub fn corpus_gleu<T, H, RS, R>(
    hypotheses: &[H],
    list_of_references: &[RS],
    range: &NgramRange,
) -> f64
where
    T: Eq + Hash,
    H: AsRef<[T]>,
    RS: AsRef<[R]>,
    R: AsRef<[T]>,
{
    corpus_accumulator(hypotheses, list_of_references, range).score()
}

/// Raw `(matching, total)` sums behind [`corpus_gleu`], for callers that merge partial corpora.
pub fn corpus_accumulator<T, H, RS, R>(
    hypotheses: &[H],
    list_of_references: &[RS],
    range: &NgramRange,
) -> CorpusAccumulator
where
    T: Eq + Hash,
    H: AsRef<[T]>,
    RS: AsRef<[R]>,
    R: AsRef<[T]>,
{
    let mut acc = CorpusAccumulator::new();
    for (hypothesis, references) in hypotheses.iter().zip(list_of_references) {
        if let Some(stats) = best_match(hypothesis.as_ref(), references.as_ref(), range) {
            acc.add(&stats);
        }
    }
    acc
}
