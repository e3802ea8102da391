//! # Web Server Routes for the Sentiment UI
//!
//! This module defines the Actix web server routes and handlers: the HTML page at
//! `/`, the lifecycle status at `/status`, and predictions at `/predict`.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_files::NamedFile;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::config::ServerConfig;
use crate::loader::load_artifacts;
use crate::session::{accepts_submission, Session, SessionError, SessionState};

/// Resolved against the working directory the server is started from.
const INDEX_HTML: &str = "./src/ui/index.html";

/// Session shared by all workers. The lock is only held to read or update
/// lifecycle state, never while the classifier runs.
pub type SharedSession = Mutex<Session<Arc<dyn Classifier>>>;

#[derive(Deserialize, Debug)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Serialize, Debug)]
pub struct PredictResponse {
    pub score: Option<f32>,
}

#[derive(Serialize, Debug)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub state: SessionState,
    pub prediction: Option<f32>,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

fn lock_session(session: &SharedSession) -> MutexGuard<'_, Session<Arc<dyn Classifier>>> {
    // Nothing panics while the lock is held, so a poisoned lock still holds
    // consistent state.
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn placeholder_page(body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!("<!DOCTYPE html><html><body><div>{}</div></body></html>", body))
}

/// Serves the main HTML page (`index.html`) once the model is ready.
///
/// While loading, a "Loading model" placeholder is returned instead, and after a
/// failed load the page carries the (HTML-escaped) failure message.
pub async fn index(req: HttpRequest, session: web::Data<SharedSession>) -> actix_web::Result<HttpResponse> {
    let state = lock_session(&session).state().clone();
    match state {
        SessionState::Ready | SessionState::Predicting => {
            let page = NamedFile::open_async(INDEX_HTML).await?;
            Ok(page.into_response(&req))
        }
        SessionState::Failed(message) => Ok(placeholder_page(&format!(
            "Error while fetching model, {}",
            html_escape::encode_text(&message)
        ))),
        SessionState::Uninitialized | SessionState::Loading => {
            Ok(placeholder_page("\"Loading model, hold on!\""))
        }
    }
}

/// Reports the lifecycle state and the latest prediction.
pub async fn status(session: web::Data<SharedSession>) -> HttpResponse {
    let session = lock_session(&session);
    HttpResponse::Ok().json(StatusResponse {
        state: session.state().clone(),
        prediction: session.last_prediction(),
    })
}

/// Scores the submitted text.
///
/// # Returns
/// - **200 OK** with `{"score": <f32>}` on success.
/// - **202 Accepted** with `{"score": null}` when the text is too long to be
///   submitted (at least `max_len` characters).
/// - **503 Service Unavailable** while the model is loading or after it failed
///   to load.
/// - **500 Internal Server Error** when the classifier fails.
pub async fn predict(session: web::Data<SharedSession>, body: web::Json<PredictRequest>) -> HttpResponse {
    let request_id = Uuid::new_v4();
    let text = body.into_inner().text;

    let ready = lock_session(&session).ready_context();
    let context = match ready {
        Ok(context) => context,
        Err(e) => {
            warn!("[{}] Prediction refused: {}", request_id, e);
            return HttpResponse::ServiceUnavailable().json(ErrorResponse { error: e.to_string() });
        }
    };

    let max_len = context.metadata().max_len;
    if !accepts_submission(&text, max_len) {
        info!(
            "[{}] Ignoring submission of {} characters (max_len {})",
            request_id,
            text.chars().count(),
            max_len
        );
        return HttpResponse::Accepted().json(PredictResponse { score: None });
    }

    match context.predict(&text) {
        Ok(score) => {
            info!("[{}] Prediction: {:.4}", request_id, score);
            lock_session(&session).record_prediction(score);
            HttpResponse::Ok().json(PredictResponse { score: Some(score) })
        }
        Err(e) => {
            error!("[{}] Prediction failed: {}", request_id, e);
            let e = SessionError::from(e);
            HttpResponse::InternalServerError().json(ErrorResponse { error: e.to_string() })
        }
    }
}

/// Registers the UI routes on an Actix `App`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/status", web::get().to(status))
        .route("/predict", web::post().to(predict));
}

/// Loads the artifacts and runs the Actix web server.
///
/// A failed load does not stop the server: the session stays `Failed` and the
/// page reports the error, as the browser application did.
///
/// # Returns
/// A `std::io::Result<()>` which is `Ok(())` if the server runs successfully,
/// or an `Err` if there's an issue binding to the port or starting the server.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let mut session: Session<Arc<dyn Classifier>> = Session::new();
    if let Err(e) = session.load_with(|| load_artifacts(&config.metadata_path, &config.model_path)) {
        error!("Serving without a model: {}", e);
    }
    let session: web::Data<SharedSession> = web::Data::new(Mutex::new(session));

    info!("Starting server at http://{}:{}/", config.host, config.port);
    HttpServer::new(move || App::new().app_data(session.clone()).configure(configure_routes))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
