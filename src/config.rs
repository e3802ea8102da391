use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use clap::Parser;

use crate::loader::LoadError;

/// Word-index metadata shipped alongside a pretrained sentiment classifier.
///
/// Supplied once by the loading step and never mutated afterwards. Unknown
/// fields in the metadata document (`model_type`, `epochs`, ...) are ignored.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VocabularyMetadata {
    /// Lower-case word to base index.
    pub word_index: HashMap<String, i64>,
    /// Offset added to every resolved base index.
    pub index_from: i64,
    /// Upper bound used for the out-of-vocabulary check.
    pub vocabulary_size: i64,
    /// Length every shaped sequence must have.
    pub max_len: usize,
}

impl VocabularyMetadata {
    pub fn load(metadata_path: &str) -> Result<Self, LoadError> {
        if !Path::new(metadata_path).exists() {
            return Err(LoadError::NotFound(metadata_path.to_string()));
        }

        let mut file = File::open(metadata_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, LoadError> {
        let metadata: VocabularyMetadata = serde_json::from_str(contents)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Checks `index_from >= 0`, `max_len > 0` and `vocabulary_size > 0`.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.index_from < 0 {
            return Err(LoadError::InvalidMetadata(format!(
                "index_from must be non-negative, got {}",
                self.index_from
            )));
        }
        if self.max_len == 0 {
            return Err(LoadError::InvalidMetadata("max_len must be greater than zero".to_string()));
        }
        if self.vocabulary_size <= 0 {
            return Err(LoadError::InvalidMetadata(format!(
                "vocabulary_size must be positive, got {}",
                self.vocabulary_size
            )));
        }
        Ok(())
    }
}

/// Options for the web server binary.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Serve sentiment predictions over HTTP", long_about = None)]
pub struct ServerConfig {
    #[clap(long, value_parser)]
    pub metadata_path: String,
    #[clap(long, value_parser)]
    pub model_path: String,
    #[clap(long, value_parser, default_value = "127.0.0.1")]
    pub host: String,
    #[clap(long, value_parser, default_value_t = 8080)]
    pub port: u16,
}
