//! HTTP front end of the gateway.
//!
//! Provides:
//! - `POST /query`  : decode, prove and answer a resolver call
//! - `GET /healthz` : liveness probe (always 200 while the process is alive)
//! - `GET /readyz`  : readiness probe (200 once the service is initialised)

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use alloy_primitives::hex;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Instrument, error, info, info_span, warn};

use crate::{
    Dispatcher, GatewayError, QueryRequest,
    metrics::{OUTCOME_OK, record_request},
};

/// State shared across all HTTP handlers.
#[derive(Clone)]
struct ServerState {
    dispatcher: Dispatcher,
    /// Set to `true` once the service has completed initialisation.
    ready: Arc<AtomicBool>,
    request_timeout: Duration,
}

/// Body of every non-200 `/query` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable reason.
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse { error: self.public_message() })).into_response()
    }
}

/// `GET /healthz` : liveness probe.
async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz` : readiness probe.
async fn readiness(State(state): State<ServerState>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// `POST /query` : answers one resolver call within the request deadline.
///
/// Bodies the JSON extractor rejects are answered like any other undecodable
/// call: 400 with an `{"error": ...}` body.
async fn query(
    State(state): State<ServerState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = GatewayError::SelectorDecode(rejection.body_text());
            record_request(err.outcome(), 0.0);
            warn!(error = %err, status = %rejection.status(), "Rejected query body");
            return err.into_response();
        }
    };

    let selector = hex::encode_prefixed(request.data.get(..4).unwrap_or(&request.data[..]));
    let span = info_span!("query", stub = %request.address, %selector);

    async move {
        let started = Instant::now();
        let result =
            match tokio::time::timeout(state.request_timeout, state.dispatcher.dispatch(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(state.request_timeout)),
            };
        let elapsed = started.elapsed();

        match result {
            Ok(response) => {
                record_request(OUTCOME_OK, elapsed.as_secs_f64());
                info!(?elapsed, bytes = response.data.len(), "Answered query");
                (StatusCode::OK, Json(response)).into_response()
            }
            Err(err) => {
                record_request(err.outcome(), elapsed.as_secs_f64());
                if err.status_code().is_server_error() {
                    error!(error = %err, ?elapsed, "Query failed");
                } else {
                    warn!(error = %err, "Rejected query");
                }
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// CORS policy allowing browser clients from any origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any)
}

/// Builds the gateway router.
pub fn router(dispatcher: Dispatcher, ready: Arc<AtomicBool>, request_timeout: Duration) -> Router {
    let state = ServerState { dispatcher, ready, request_timeout };

    Router::new()
        .route("/query", post(query))
        .route("/healthz", get(liveness))
        .route("/readyz", get(readiness))
        .layer(cors_layer())
        .with_state(state)
}

/// Serves `app` on `addr` until `cancel` is triggered.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to `addr`.
pub async fn serve(addr: SocketAddr, app: Router, cancel: CancellationToken) -> eyre::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Gateway server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("Gateway server stopped");
    Ok(())
}
