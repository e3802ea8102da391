use crate::config::VocabularyMetadata;

/// Index used for padding positions.
pub const PAD_CHAR: i64 = 0;
/// Index substituted for any token whose resolved index exceeds the vocabulary bound.
pub const OOV_CHAR: i64 = 2;

/// Base index used for words missing from `word_index`, before the offset is applied.
const MISSING_WORD_BASE: i64 = -1;

/// Maps a single token to its classifier index.
///
/// The lookup result (or `-1` for an unknown word) is shifted by `index_from`,
/// and anything strictly greater than `vocabulary_size` collapses to
/// [`OOV_CHAR`]. The comparison is against the size, not the largest valid
/// index, and must stay that way for the paired classifier.
pub fn resolve_index(token: &str, vocab: &VocabularyMetadata) -> i64 {
    let base = vocab.word_index.get(token).copied().unwrap_or(MISSING_WORD_BASE);
    // Saturates so an oversized base index still lands above the bound.
    let word_index = base.saturating_add(vocab.index_from);
    if word_index > vocab.vocabulary_size {
        OOV_CHAR
    } else {
        word_index
    }
}

/// Resolves every token in order. Output length always equals input length.
pub fn resolve_indices<S: AsRef<str>>(tokens: &[S], vocab: &VocabularyMetadata) -> Vec<i64> {
    tokens
        .iter()
        .map(|token| resolve_index(token.as_ref(), vocab))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_vocab() -> VocabularyMetadata {
        let mut word_index = HashMap::new();
        word_index.insert("good".to_string(), 5);
        VocabularyMetadata {
            word_index,
            index_from: 3,
            vocabulary_size: 10,
            max_len: 4,
        }
    }

    #[test]
    fn test_known_word_is_offset() {
        assert_eq!(resolve_index("good", &sample_vocab()), 8);
    }

    #[test]
    fn test_unknown_word_below_bound_is_not_replaced() {
        // -1 + 3 = 2 <= 10, so the computed value is kept (it happens to equal OOV_CHAR).
        assert_eq!(resolve_index("unknownword", &sample_vocab()), 2);
    }

    #[test]
    fn test_unknown_word_above_bound_is_forced_to_oov() {
        let vocab = VocabularyMetadata {
            index_from: 20,
            ..sample_vocab()
        };
        // -1 + 20 = 19 > 10
        assert_eq!(resolve_index("unknownword", &vocab), OOV_CHAR);
    }

    #[test]
    fn test_known_word_above_bound_is_forced_to_oov() {
        let mut vocab = sample_vocab();
        vocab.word_index.insert("rare".to_string(), 8); // 8 + 3 = 11 > 10
        assert_eq!(resolve_index("rare", &vocab), OOV_CHAR);
    }

    #[test]
    fn test_index_equal_to_vocabulary_size_is_kept() {
        let mut vocab = sample_vocab();
        vocab.word_index.insert("edge".to_string(), 7); // 7 + 3 = 10, not > 10
        assert_eq!(resolve_index("edge", &vocab), 10);
    }

    #[test]
    fn test_huge_base_index_saturates_to_oov() {
        let vocab = VocabularyMetadata::from_json_str(
            r#"{"word_index": {"huge": 9223372036854775807}, "index_from": 3, "vocabulary_size": 10, "max_len": 4}"#,
        )
        .unwrap();
        assert_eq!(resolve_index("huge", &vocab), OOV_CHAR);
    }

    #[test]
    fn test_resolve_indices_preserves_order_and_length() {
        let tokens = vec!["good", "", "nope", "good"];
        assert_eq!(resolve_indices(&tokens, &sample_vocab()), vec![8, 2, 2, 8]);
        let empty: Vec<String> = Vec::new();
        assert!(resolve_indices(&empty, &sample_vocab()).is_empty());
    }
}
