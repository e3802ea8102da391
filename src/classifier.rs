use ndarray::Array2;

#[derive(thiserror::Error, Debug)]
pub enum ClassifierError {
    #[error("input has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("index {index} at position {position} is outside the embedding table ({rows} rows)")]
    IndexOutOfRange {
        index: i64,
        position: usize,
        rows: usize,
    },
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A pretrained binary classifier over fixed-length index sequences.
///
/// `input` has shape `[batch, max_len]`; the returned array is owned by the
/// caller, which reads the score from element `[0, 0]` and drops it. Inference
/// takes `&self` so a single loaded model can serve concurrent predictions.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &Array2<i64>) -> Result<Array2<f32>, ClassifierError>;

    fn name(&self) -> &str {
        "classifier"
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, input: &Array2<i64>) -> Result<Array2<f32>, ClassifierError> {
        (**self).predict(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn predict(&self, input: &Array2<i64>) -> Result<Array2<f32>, ClassifierError> {
        (**self).predict(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
