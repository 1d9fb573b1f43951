//! HTTP server setup and the public chat handler.
//!
//! # Responsibilities
//! - Create the Axum router with the chat and health handlers
//! - Wire up middleware (tracing, request timeout, security headers)
//! - Assign a session id when the request carries none
//! - Run the admission pipeline and map outcomes to responses
//! - Forward admitted messages to the chat backend

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::admission::{AdmissionOutcome, AdmissionPipeline, RejectionCode, Role};
use crate::chat::ChatBackend;
use crate::config::GatewayConfig;
use crate::http::response::{ChatBody, ErrorBody};
use crate::net::BoundedListener;
use crate::observability::metrics;
use crate::quota::QuotaStore;
use crate::security::headers::security_headers_middleware;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AdmissionPipeline>,
    pub chat: Arc<dyn ChatBackend>,
}

/// HTTP server for the chat gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server. The quota store and chat backend are
    /// injected so tests can substitute doubles.
    pub fn new(
        config: GatewayConfig,
        store: Arc<dyn QuotaStore>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        let pipeline = Arc::new(AdmissionPipeline::new(
            config.admission.clone(),
            &config.quota_store,
            store,
        ));

        let state = AppState { pipeline, chat };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers. The security
    /// header layer is outermost so every response carries the set,
    /// including middleware-produced errors.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/public/chat/message", post(chat_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(security_headers_middleware))
    }

    /// Run the server, accepting connections on the given listener
    /// until the shutdown signal fires. The listener carries the
    /// connection cap, so the cap applies to everything served here.
    pub async fn run(
        self,
        listener: BoundedListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Request body for the public chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
    pub session_id: Option<String>,
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

fn generate_session_id() -> String {
    format!("sess-{}", Uuid::new_v4())
}

/// Public chat handler: admission first, then the downstream call.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatMessageRequest>,
) -> Response {
    let start_time = Instant::now();

    // A caller without a session id gets a fresh one; it is echoed back
    // so the client can reuse it. Generation happens before admission
    // so the quota is tracked under the id the client will keep using.
    let session_id = request
        .session_id
        .clone()
        .unwrap_or_else(generate_session_id);

    let outcome = state
        .pipeline
        .admit(&request.message, &session_id, Role::Public)
        .await;

    let response = match outcome {
        AdmissionOutcome::Rejected(rejection) => match rejection.code {
            RejectionCode::InvalidInput => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::invalid_input()),
            )
                .into_response(),
            RejectionCode::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody::rate_limit_exceeded(rejection.quota.as_ref())),
            )
                .into_response(),
        },
        AdmissionOutcome::Admitted { quota } => {
            // Admission's job ends here; the reply is the collaborator's.
            match state.chat.reply(&request.message, &session_id).await {
                Ok(reply) => (
                    StatusCode::OK,
                    Json(ChatBody::new(reply, session_id, quota.as_ref())),
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!(error = %e, "Chat backend failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        Json(ErrorBody::generation_failed()),
                    )
                        .into_response()
                }
            }
        }
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}
