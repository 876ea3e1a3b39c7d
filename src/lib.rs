mod config;
mod error;
mod gleu;
mod ngram;
mod score;
mod stats;
pub mod telemetry;

// Inputs are presumed to be PRE-TOKENIZED: each prediction and reference is
// already a sequence of tokens, so no splitting or normalization happens here.

pub use crate::config::{GleuConfig, NgramRange, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN};
pub use crate::error::{GleuError, Result};
pub use crate::gleu::{best_match, corpus_accumulator, corpus_gleu, sentence_gleu};
pub use crate::ngram::NgramCounts;
pub use crate::score::{compute, score_batch, GleuOutput, GleuScore, PairContext};
pub use crate::stats::{CorpusAccumulator, MatchStats};

#[cfg(feature = "python")]
mod bindings {
    use crate::{GleuConfig, GleuError, GleuOutput, GleuScore};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;
    use pyo3::types::PyDict;
    use tokio::runtime::Runtime;

    impl From<GleuError> for PyErr {
        fn from(err: GleuError) -> PyErr {
            if err.is_argument_error() {
                PyValueError::new_err(err.to_string())
            } else {
                PyRuntimeError::new_err(err.to_string())
            }
        }
    }

    fn to_dict(py: Python<'_>, output: GleuOutput) -> PyResult<Bound<'_, PyDict>> {
        let dict = PyDict::new(py);
        match output.google_bleu {
            GleuScore::Sentence(scores) => dict.set_item("google_bleu", scores)?,
            GleuScore::Corpus(score) => dict.set_item("google_bleu", score)?,
        }
        Ok(dict)
    }

    #[pyfunction]
    #[pyo3(signature = (predictions, references, sentence_level=true, min_len=1, max_len=4))]
    pub fn compute(
        py: Python<'_>,
        predictions: Vec<Vec<String>>,
        references: Vec<Vec<Vec<String>>>,
        sentence_level: bool,
        min_len: i64,
        max_len: i64,
    ) -> PyResult<Bound<'_, PyDict>> {
        let config = GleuConfig::from_signed(sentence_level, min_len, max_len)?;
        // Scoring is pure Rust, so release the GIL while it runs
        let output = py.allow_threads(|| crate::compute(&predictions, &references, &config))?;
        to_dict(py, output)
    }

    #[pyfunction]
    #[pyo3(signature = (predictions, references, sentence_level=true, min_len=1, max_len=4))]
    pub fn score_batch(
        py: Python<'_>,
        predictions: Vec<Vec<String>>,
        references: Vec<Vec<Vec<String>>>,
        sentence_level: bool,
        min_len: i64,
        max_len: i64,
    ) -> PyResult<Bound<'_, PyDict>> {
        let config = GleuConfig::from_signed(sentence_level, min_len, max_len)?;
        let output = py.allow_threads(|| {
            let rt = Runtime::new().map_err(|e| GleuError::Worker(e.to_string()))?;
            rt.block_on(crate::score_batch(predictions, references, config))
        })?;
        to_dict(py, output)
    }
}

#[cfg(feature = "python")]
#[pyo3::pymodule]
fn _rust(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;

    // the host process may already own a subscriber
    let _ = telemetry::init_tracing("warn", false);
    m.add_function(wrap_pyfunction!(bindings::compute, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::score_batch, m)?)?;
    Ok(())
}
