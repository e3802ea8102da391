use std::fmt;

use log::debug;
use ndarray::Array2;

use crate::classifier::{Classifier, ClassifierError};
use crate::config::VocabularyMetadata;
use crate::sequence::{pad_sequences, Padding, Truncating};
use crate::tokenizer::tokenize;
use crate::vocab::{resolve_indices, PAD_CHAR};

#[derive(thiserror::Error, Debug)]
pub enum PredictionError {
    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("classifier returned an empty output")]
    EmptyOutput,
    #[error("classifier score {0} is outside [0, 1]")]
    ScoreOutOfRange(f32),
}

/// Turns raw text into the `[1, max_len]` tensor handed to the classifier.
///
/// Tokenizes, resolves each token against `vocab`, then pre-truncates and
/// pre-pads a batch of one with [`PAD_CHAR`].
pub fn encode(text: &str, vocab: &VocabularyMetadata) -> Array2<i64> {
    let tokens = tokenize(text);
    let indices = resolve_indices(&tokens, vocab);
    debug!("Tokens: {:?} -> indices: {:?}", tokens, indices);

    let shaped = pad_sequences(
        &[indices],
        vocab.max_len,
        Padding::default(),
        Truncating::default(),
        PAD_CHAR,
    );
    let flat: Vec<i64> = shaped.into_iter().flatten().collect();
    assert_eq!(
        flat.len(),
        vocab.max_len,
        "shaped sequence length does not match max_len"
    );

    Array2::from_shape_fn((1, vocab.max_len), |(_, j)| flat[j])
}

/// Scores `text` with `classifier`.
///
/// The classifier only ever sees a fully shaped tensor. Both the input tensor and
/// the classifier output are dropped before this returns, on success or error.
/// Classifier failures are returned as-is; nothing is retried.
pub fn predict<C: Classifier + ?Sized>(
    text: &str,
    vocab: &VocabularyMetadata,
    classifier: &C,
) -> Result<f32, PredictionError> {
    let input = encode(text, vocab);
    debug!("Shaped input for {}: {:?}", classifier.name(), input.row(0).to_vec());

    let output = classifier.predict(&input)?;
    let score = output.iter().next().copied().ok_or(PredictionError::EmptyOutput)?;
    if !(0.0..=1.0).contains(&score) {
        return Err(PredictionError::ScoreOutOfRange(score));
    }

    debug!("Score: {:.4}", score);
    Ok(score)
}

/// Vocabulary metadata paired with the classifier it was built for.
///
/// Passed explicitly to whoever needs to predict; independent contexts share
/// nothing.
pub struct SentimentContext<C> {
    metadata: VocabularyMetadata,
    classifier: C,
}

impl<C: Classifier> SentimentContext<C> {
    pub fn new(metadata: VocabularyMetadata, classifier: C) -> Self {
        Self { metadata, classifier }
    }

    pub fn metadata(&self) -> &VocabularyMetadata {
        &self.metadata
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn encode(&self, text: &str) -> Array2<i64> {
        encode(text, &self.metadata)
    }

    pub fn predict(&self, text: &str) -> Result<f32, PredictionError> {
        predict(text, &self.metadata, &self.classifier)
    }
}

impl<C: Classifier> fmt::Debug for SentimentContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentContext")
            .field("words", &self.metadata.word_index.len())
            .field("vocabulary_size", &self.metadata.vocabulary_size)
            .field("max_len", &self.metadata.max_len)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
