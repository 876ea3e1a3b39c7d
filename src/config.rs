use serde::{Deserialize, Serialize};

use crate::error::{GleuError, Result};

pub const DEFAULT_MIN_LEN: usize = 1;
pub const DEFAULT_MAX_LEN: usize = 4;

/// Inclusive range of n-gram orders to extract.
///
/// Only constructible through [`NgramRange::new`], so any value in hand
/// satisfies `1 <= min_len <= max_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramRange {
    min_len: usize,
    max_len: usize,
}

impl NgramRange {
    pub fn new(min_len: usize, max_len: usize) -> Result<Self> {
        if min_len < 1 {
            return Err(GleuError::MinLenTooSmall(0));
        }
        if min_len > max_len {
            return Err(GleuError::InvertedRange { min_len, max_len });
        }
        Ok(NgramRange { min_len, max_len })
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn orders(&self) -> std::ops::RangeInclusive<usize> {
        self.min_len..=self.max_len
    }

    /// Orders that can occur in a sequence of `len` tokens; empty when
    /// `len < min_len`.
    pub fn orders_for(&self, len: usize) -> std::ops::RangeInclusive<usize> {
        self.min_len..=self.max_len.min(len)
    }

    /// Number of n-grams a sequence of `len` tokens yields across the range.
    pub fn ngram_total(&self, len: usize) -> usize {
        self.orders_for(len).map(|n| len + 1 - n).sum()
    }
}

impl Default for NgramRange {
    fn default() -> Self {
        NgramRange {
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

/// Options accepted by [`crate::compute`].
///
/// Missing fields fall back to sentence level scoring over orders 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GleuConfig {
    pub sentence_level: bool,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for GleuConfig {
    fn default() -> Self {
        GleuConfig {
            sentence_level: true,
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

impl GleuConfig {
    pub fn new(sentence_level: bool, min_len: usize, max_len: usize) -> Self {
        GleuConfig {
            sentence_level,
            min_len,
            max_len,
        }
    }

    pub fn corpus() -> Self {
        GleuConfig {
            sentence_level: false,
            ..Default::default()
        }
    }

    pub fn with_orders(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    pub fn range(&self) -> Result<NgramRange> {
        NgramRange::new(self.min_len, self.max_len)
    }

    /// Builds a validated config from signed orders, as handed over by callers
    /// that can't guarantee non-negative values.
    pub fn from_signed(sentence_level: bool, min_len: i64, max_len: i64) -> Result<Self> {
        if min_len < 1 {
            return Err(GleuError::MinLenTooSmall(min_len));
        }
        let min_len =
            usize::try_from(min_len).map_err(|e| GleuError::InvalidConfig(e.to_string()))?;
        // a negative max_len is always below min_len
        let max_len = usize::try_from(max_len).unwrap_or(if max_len < 0 { 0 } else { usize::MAX });
        let config = GleuConfig::new(sentence_level, min_len, max_len);
        config.range()?;
        Ok(config)
    }

    /// Parses and validates a JSON config such as `{"min_len": 2, "sentence_level": false}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GleuConfig =
            serde_json::from_str(json).map_err(|e| GleuError::InvalidConfig(e.to_string()))?;
        config.range()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_zero_min_len() {
        assert_eq!(NgramRange::new(0, 4), Err(GleuError::MinLenTooSmall(0)));
    }

    #[test]
    fn test_range_rejects_inverted_orders() {
        assert_eq!(
            NgramRange::new(3, 2),
            Err(GleuError::InvertedRange {
                min_len: 3,
                max_len: 2
            })
        );
    }

    #[test]
    fn test_range_single_order() {
        let range = NgramRange::new(2, 2).unwrap();
        assert_eq!(range.orders().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_ngram_total() {
        let range = NgramRange::new(1, 4).unwrap();
        // 5 + 4 + 3 + 2
        assert_eq!(range.ngram_total(5), 14);
        // orders longer than the sequence contribute nothing
        assert_eq!(range.ngram_total(2), 3);
        assert_eq!(range.ngram_total(0), 0);
    }

    #[test]
    fn test_orders_capped_at_sequence_length() {
        let range = NgramRange::new(2, usize::MAX).unwrap();
        assert_eq!(range.orders_for(4).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(range.orders_for(1).count(), 0);
        assert_eq!(range.ngram_total(3), 3);
    }

    #[test]
    fn test_default_config() {
        let config = GleuConfig::default();
        assert!(config.sentence_level);
        assert_eq!(config.range().unwrap(), NgramRange::default());
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config = GleuConfig::from_json_str(r#"{"min_len": 2, "sentence_level": false}"#).unwrap();
        assert_eq!(config, GleuConfig::new(false, 2, 4));
    }

    #[test]
    fn test_config_from_json_rejects_bad_range() {
        let err = GleuConfig::from_json_str(r#"{"min_len": 5, "max_len": 2}"#).unwrap_err();
        assert!(matches!(err, GleuError::InvertedRange { .. }));
    }

    #[test]
    fn test_config_from_json_rejects_malformed() {
        let err = GleuConfig::from_json_str("{min_len: }").unwrap_err();
        assert!(matches!(err, GleuError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_signed_rejects_negative_min_len() {
        let err = GleuConfig::from_signed(true, -3, 4).unwrap_err();
        assert_eq!(err, GleuError::MinLenTooSmall(-3));
        assert!(err.is_argument_error());
        assert_eq!(
            GleuConfig::from_signed(true, 0, 4),
            Err(GleuError::MinLenTooSmall(0))
        );
    }

    #[test]
    fn test_from_signed_rejects_negative_max_len() {
        let err = GleuConfig::from_signed(false, 2, -1).unwrap_err();
        assert_eq!(
            err,
            GleuError::InvertedRange {
                min_len: 2,
                max_len: 0
            }
        );
    }

    #[test]
    fn test_from_signed_accepts_valid_orders() {
        let config = GleuConfig::from_signed(false, 2, 6).unwrap();
        assert_eq!(config, GleuConfig::new(false, 2, 6));
        let config = GleuConfig::from_signed(true, 1, i64::MAX).unwrap();
        assert_eq!(config.min_len, 1);
    }

    #[test]
    fn test_corpus_config() {
        let config = GleuConfig::corpus().with_orders(2, 6);
        assert!(!config.sentence_level);
        assert_eq!(config.min_len, 2);
        assert_eq!(config.max_len, 6);
    }
}
