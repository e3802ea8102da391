//! Sentiment scoring for free-form text.
//!
//! Raw text is tokenized, mapped to vocabulary indices, shaped to the fixed
//! length a pretrained classifier expects, and scored. The `ui` module serves
//! the pipeline over HTTP and `cli` scores text from the command line.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod loader;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod sequence;
pub mod session;
pub mod tokenizer;
pub mod ui;
pub mod vocab;

pub use classifier::{Classifier, ClassifierError};
pub use config::VocabularyMetadata;
pub use pipeline::{encode, predict, PredictionError, SentimentContext};
pub use vocab::{OOV_CHAR, PAD_CHAR};
