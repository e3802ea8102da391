use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::classifier::{Classifier, ClassifierError};
use crate::loader::LoadError;
use crate::vocab::PAD_CHAR;

/// Weights document as stored on disk.
#[derive(Deserialize, Debug)]
struct ModelWeights {
    embedding: Vec<Vec<f32>>,
    dense: Vec<f32>,
    bias: f32,
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Inference-only sentiment classifier: mean-pooled word embeddings followed by
/// a single logistic unit.
///
/// Padding positions are skipped when pooling, so a fully padded row scores
/// `sigmoid(bias)`.
#[derive(Debug, Clone)]
pub struct BagOfEmbeddingsModel {
    embedding: Array2<f32>, // [rows, dim]
    dense: Array1<f32>,     // [dim]
    bias: f32,
}

impl BagOfEmbeddingsModel {
    pub fn new(embedding: Array2<f32>, dense: Array1<f32>, bias: f32) -> Result<Self, LoadError> {
        if embedding.nrows() == 0 || embedding.ncols() == 0 {
            return Err(LoadError::InvalidModel("embedding table is empty".to_string()));
        }
        if dense.len() != embedding.ncols() {
            return Err(LoadError::InvalidModel(format!(
                "dense layer has {} weights but embeddings have dimension {}",
                dense.len(),
                embedding.ncols()
            )));
        }
        Ok(Self { embedding, dense, bias })
    }

    pub fn load(model_path: &str) -> Result<Self, LoadError> {
        if !Path::new(model_path).exists() {
            return Err(LoadError::NotFound(model_path.to_string()));
        }

        let mut file = File::open(model_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, LoadError> {
        let weights: ModelWeights = serde_json::from_str(contents)?;

        let rows = weights.embedding.len();
        let dim = weights.embedding.first().map(Vec::len).unwrap_or(0);
        if let Some((row, bad)) = weights.embedding.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(LoadError::InvalidModel(format!(
                "embedding row {} has {} values, expected {}",
                row,
                bad.len(),
                dim
            )));
        }

        let flat: Vec<f32> = weights.embedding.into_iter().flatten().collect();
        let embedding = Array2::from_shape_vec((rows, dim), flat)
            .map_err(|e| LoadError::InvalidModel(format!("embedding table: {}", e)))?;

        Self::new(embedding, Array1::from_vec(weights.dense), weights.bias)
    }

    /// Number of indices the embedding table can look up (`0..rows`).
    pub fn vocabulary_rows(&self) -> usize {
        self.embedding.nrows()
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding.ncols()
    }
}

impl Classifier for BagOfEmbeddingsModel {
    fn predict(&self, input: &Array2<i64>) -> Result<Array2<f32>, ClassifierError> {
        let rows = self.embedding.nrows();
        let mut output = Array2::<f32>::zeros((input.nrows(), 1));

        for (b, sequence) in input.outer_iter().enumerate() {
            let mut pooled = Array1::<f32>::zeros(self.embedding.ncols());
            let mut count = 0usize;

            for (position, &index) in sequence.iter().enumerate() {
                if index == PAD_CHAR {
                    continue;
                }
                if index < 0 || index as usize >= rows {
                    return Err(ClassifierError::IndexOutOfRange { index, position, rows });
                }
                pooled += &self.embedding.row(index as usize);
                count += 1;
            }

            if count > 0 {
                pooled /= count as f32;
            }
            output[[b, 0]] = sigmoid(pooled.dot(&self.dense) + self.bias);
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        "bag_of_embeddings"
    }
}
