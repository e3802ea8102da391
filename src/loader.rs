//! # Artifact loading
//!
//! Reads the vocabulary metadata and classifier weights from local files. This is
//! the only step that can fail for environmental reasons; once it succeeds the
//! artifacts are immutable and shared read-only by every prediction.

use std::io;
use std::sync::Arc;

use log::{error, info};

use crate::classifier::Classifier;
use crate::config::VocabularyMetadata;
use crate::model::BagOfEmbeddingsModel;
use crate::pipeline::SentimentContext;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid vocabulary metadata: {0}")]
    InvalidMetadata(String),
    #[error("invalid model weights: {0}")]
    InvalidModel(String),
    #[error("model and metadata disagree: {0}")]
    Inconsistent(String),
}

/// Everything a prediction needs, produced once by [`load_artifacts`].
pub type LoadedArtifacts = SentimentContext<Arc<dyn Classifier>>;

/// Loads and cross-checks the metadata and model at the given paths.
///
/// The embedding table must be able to look up every index the resolver can
/// produce, i.e. `0..=vocabulary_size`.
pub fn load_artifacts(metadata_path: &str, model_path: &str) -> Result<LoadedArtifacts, LoadError> {
    let result = load_checked(metadata_path, model_path);
    if let Err(e) = &result {
        error!("Failed to load artifacts ({}, {}): {}", metadata_path, model_path, e);
    }
    result
}

fn load_checked(metadata_path: &str, model_path: &str) -> Result<LoadedArtifacts, LoadError> {
    info!("Loading vocabulary metadata from: {}", metadata_path);
    let metadata = VocabularyMetadata::load(metadata_path)?;

    info!("Loading model weights from: {}", model_path);
    let model = BagOfEmbeddingsModel::load(model_path)?;

    check_consistency(&metadata, &model)?;
    info!(
        "Artifacts loaded: {} words, vocabulary_size {}, max_len {}, embedding dim {}",
        metadata.word_index.len(),
        metadata.vocabulary_size,
        metadata.max_len,
        model.embedding_dim()
    );

    let classifier: Arc<dyn Classifier> = Arc::new(model);
    Ok(SentimentContext::new(metadata, classifier))
}

fn check_consistency(metadata: &VocabularyMetadata, model: &BagOfEmbeddingsModel) -> Result<(), LoadError> {
    let required_rows = metadata.vocabulary_size as usize + 1;
    if model.vocabulary_rows() < required_rows {
        return Err(LoadError::Inconsistent(format!(
            "embedding table has {} rows, vocabulary_size {} needs at least {}",
            model.vocabulary_rows(),
            metadata.vocabulary_size,
            required_rows
        )));
    }
    Ok(())
}
