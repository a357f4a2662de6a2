use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::any::Any;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::models::{
    ConversationRequest, ConversationResponse, ScrapeRequest, ScrapeResponse,
};
use crate::api::response;
use crate::error::{AppError, Result};
use crate::pipeline::ScrapeOutcome;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/summarize-conversation", post(summarize_conversation_handler))
        .route("/scrape", post(scrape_handler))
        .fallback(not_found);

    with_middleware(routes).with_state(app_state)
}

/// Panic guard, request tracing and permissive CORS around `router`.
pub fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
}

async fn summarize_conversation_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload.map_err(validation_error)?;
    let started = Instant::now();

    let summary = state
        .pipeline
        .run_conversation_pipeline(&req.raw_conversation)
        .await?;

    tracing::info!(elapsed = ?started.elapsed(), "conversation summarized");
    Ok(response::success(ConversationResponse {
        summary: summary.text,
    }))
}

async fn scrape_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload.map_err(validation_error)?;
    let word_limit = req
        .word_limit
        .unwrap_or_else(|| state.pipeline.default_word_limit());
    tracing::info!(url = %req.url, summarize = req.summarize, word_limit, "processing scrape request");
    let started = Instant::now();

    let outcome = state
        .pipeline
        .run_scrape_pipeline(&req.url, req.summarize, word_limit)
        .await?;

    tracing::info!(url = %req.url, elapsed = ?started.elapsed(), "scrape request completed");
    let body = match outcome {
        ScrapeOutcome::Extracted(extracted) => ScrapeResponse::Extracted {
            url: req.url,
            extracted_text: extracted.text,
        },
        ScrapeOutcome::Summarized { summary, .. } => ScrapeResponse::Summarized {
            url: req.url,
            summary: summary.text,
        },
    };
    Ok(response::success(body))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    response::error(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}

fn validation_error(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Unhandled(details).into_response()
}
