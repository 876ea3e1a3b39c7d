use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GleuConfig, NgramRange};
use crate::error::{GleuError, Result};
use crate::gleu::best_match;
use crate::stats::{CorpusAccumulator, MatchStats};

/// Either one score per prediction or one score for the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GleuScore {
    Sentence(Vec<f64>),
    Corpus(f64),
}

/// Serializes as `{"google_bleu": [...]}` or `{"google_bleu": x}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GleuOutput {
    pub google_bleu: GleuScore,
}

impl GleuOutput {
    pub fn sentence_scores(&self) -> Option<&[f64]> {
        match &self.google_bleu {
            GleuScore::Sentence(scores) => Some(scores),
            GleuScore::Corpus(_) => None,
        }
    }

    pub fn corpus_score(&self) -> Option<f64> {
        match self.google_bleu {
            GleuScore::Corpus(score) => Some(score),
            GleuScore::Sentence(_) => None,
        }
    }

    fn from_stats(stats: &[Option<MatchStats>], sentence_level: bool) -> Self {
        let google_bleu = if sentence_level {
            GleuScore::Sentence(
                stats
                    .iter()
                    .map(|s| s.map(|s| s.score()).unwrap_or(0.0))
                    .collect(),
            )
        } else {
            GleuScore::Corpus(stats.iter().flatten().collect::<CorpusAccumulator>().score())
        };
        GleuOutput { google_bleu }
    }
}

fn validate(n_predictions: usize, n_references: usize, config: &GleuConfig) -> Result<NgramRange> {
    if n_predictions != n_references {
        return Err(GleuError::LengthMismatch {
            predictions: n_predictions,
            references: n_references,
        });
    }
    config.range()
}

/// Scores `predictions` against the parallel list of `references`.
///
/// Arguments are validated before any pair is scored.
pub fn compute<T, H, RS, R>(
    predictions: &[H],
    references: &[RS],
    config: &GleuConfig,
) -> Result<GleuOutput>
where
    T: Eq + Hash,
    H: AsRef<[T]>,
    RS: AsRef<[R]>,
    R: AsRef<[T]>,
{
    let range = validate(predictions.len(), references.len(), config)?;
    debug!(
        pairs = predictions.len(),
        min_len = range.min_len(),
        max_len = range.max_len(),
        sentence_level = config.sentence_level,
        "computing google_bleu"
    );

    let stats: Vec<Option<MatchStats>> = predictions
        .iter()
        .zip(references)
        .map(|(pred, refs)| best_match(pred.as_ref(), refs.as_ref(), &range))
        .collect();
    Ok(GleuOutput::from_stats(&stats, config.sentence_level))
}

/// One hypothesis and its references, owned so it can move into a worker.
pub struct PairContext<T> {
    hypothesis: Vec<T>,
    references: Vec<Vec<T>>,
}

impl<T: Eq + Hash> PairContext<T> {
    pub fn new(hypothesis: Vec<T>, references: Vec<Vec<T>>) -> Self {
        PairContext {
            hypothesis,
            references,
        }
    }

    pub fn best_match(&self, range: &NgramRange) -> Option<MatchStats> {
        best_match(&self.hypothesis, &self.references, range)
    }
}

fn worker_count(n_pairs: usize) -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(n_pairs)
        .max(1)
}

/// Same result as [`compute`], with pairs spread over blocking workers.
///
/// Each worker takes a contiguous chunk of pairs, so sentence scores come
/// back in input order. In corpus mode every chunk is reduced to a partial
/// accumulator and the partials are merged once.
pub async fn score_batch<T>(
    predictions: Vec<Vec<T>>,
    references: Vec<Vec<Vec<T>>>,
    config: GleuConfig,
) -> Result<GleuOutput>
where
    T: Eq + Hash + Send + 'static,
{
    let range = validate(predictions.len(), references.len(), &config)?;
    let n_pairs = predictions.len();
    let n_workers = worker_count(n_pairs);
    let chunk_size = n_pairs.div_ceil(n_workers).max(1);
    debug!(pairs = n_pairs, workers = n_workers, "scoring google_bleu batch");

    let mut pairs = predictions
        .into_iter()
        .zip(references)
        .map(|(hyp, refs)| PairContext::new(hyp, refs));
    let mut chunks: Vec<Vec<PairContext<T>>> = Vec::with_capacity(n_workers);
    loop {
        let chunk: Vec<PairContext<T>> = pairs.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }

    let tasks = chunks.into_iter().map(|chunk| {
        tokio::task::spawn_blocking(move || {
            chunk
                .iter()
                .map(|pair| pair.best_match(&range))
                .collect::<Vec<Option<MatchStats>>>()
        })
    });

    let mut chunk_stats = Vec::with_capacity(n_workers);
    for joined in futures::future::join_all(tasks).await {
        chunk_stats.push(joined.map_err(|e| GleuError::Worker(e.to_string()))?);
    }

    let output = if config.sentence_level {
        let stats: Vec<Option<MatchStats>> = chunk_stats.into_iter().flatten().collect();
        GleuOutput::from_stats(&stats, true)
    } else {
        let acc = chunk_stats
            .iter()
            .map(|chunk| chunk.iter().flatten().collect::<CorpusAccumulator>())
            .fold(CorpusAccumulator::new(), CorpusAccumulator::merge);
        GleuOutput {
            google_bleu: GleuScore::Corpus(acc.score()),
        }
    };
    Ok(output)
}
