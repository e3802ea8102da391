//! # Request lifecycle
//!
//! Tracks where the application is between start-up and serving predictions:
//!
//! ```text
//! Uninitialized -> Loading -> Ready <-> Predicting
//!                     \
//!                      -> Failed (terminal)
//! ```
//!
//! The loaded artifacts are held behind an `Arc`, so a caller can take the
//! context out of the session, predict without holding any lock, and record
//! the score afterwards.

use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;

use crate::classifier::Classifier;
use crate::loader::LoadError;
use crate::pipeline::{PredictionError, SentimentContext};

/// Serialized for `/status` as `{"state": "ready"}`, or
/// `{"state": "failed", "message": ...}` after a failed load.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
    Predicting,
    Failed(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("model is not ready (state: {0:?})")]
    NotReady(SessionState),
    #[error("Error while fetching model, {0}")]
    Failed(String),
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Submissions at least as long as `max_len` characters are ignored, as the
/// input form does. The pipeline itself would truncate them correctly.
pub fn accepts_submission(text: &str, max_len: usize) -> bool {
    text.chars().count() < max_len
}

#[derive(Debug)]
pub struct Session<C: Classifier> {
    state: SessionState,
    context: Option<Arc<SentimentContext<C>>>,
    last_prediction: Option<f32>,
}

impl<C: Classifier> Default for Session<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Classifier> Session<C> {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            context: None,
            last_prediction: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latest score, overwritten by every successful prediction.
    pub fn last_prediction(&self) -> Option<f32> {
        self.last_prediction
    }

    pub fn begin_loading(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidTransition {
                from: self.state.clone(),
                action: "start loading",
            });
        }
        info!("Loading model and vocabulary metadata");
        self.state = SessionState::Loading;
        Ok(())
    }

    /// Completes the load started by [`Session::begin_loading`].
    ///
    /// A failed load moves the session to the terminal `Failed` state and is
    /// reported back as [`SessionError::Failed`].
    pub fn finish_loading(
        &mut self,
        loaded: Result<SentimentContext<C>, LoadError>,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Loading {
            return Err(SessionError::InvalidTransition {
                from: self.state.clone(),
                action: "finish loading",
            });
        }

        match loaded {
            Ok(context) => {
                info!("Model ready: {:?}", context);
                self.context = Some(Arc::new(context));
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                error!("Model loading failed: {}", message);
                self.state = SessionState::Failed(message.clone());
                Err(SessionError::Failed(message))
            }
        }
    }

    /// Runs `load` between [`Session::begin_loading`] and [`Session::finish_loading`].
    pub fn load_with<F>(&mut self, load: F) -> Result<(), SessionError>
    where
        F: FnOnce() -> Result<SentimentContext<C>, LoadError>,
    {
        self.begin_loading()?;
        self.finish_loading(load())
    }

    /// Shared handle to the loaded context, available only while `Ready`.
    pub fn ready_context(&self) -> Result<Arc<SentimentContext<C>>, SessionError> {
        match (&self.state, &self.context) {
            (SessionState::Ready, Some(context)) => Ok(Arc::clone(context)),
            (SessionState::Failed(message), _) => Err(SessionError::Failed(message.clone())),
            (state, _) => Err(SessionError::NotReady(state.clone())),
        }
    }

    pub fn record_prediction(&mut self, score: f32) {
        self.last_prediction = Some(score);
    }

    /// Handles one user submission.
    ///
    /// Returns `Ok(None)` when the submission is ignored by the length check.
    /// A prediction error is returned to the caller and leaves the session
    /// `Ready`.
    pub fn submit(&mut self, text: &str) -> Result<Option<f32>, SessionError> {
        let context = self.ready_context()?;
        if !accepts_submission(text, context.metadata().max_len) {
            warn!(
                "Ignoring submission of {} characters (max_len {})",
                text.chars().count(),
                context.metadata().max_len
            );
            return Ok(None);
        }

        self.state = SessionState::Predicting;
        let result = context.predict(text);
        self.state = SessionState::Ready;

        let score = result?;
        info!("Prediction: {:.4}", score);
        self.record_prediction(score);
        Ok(Some(score))
    }
}
