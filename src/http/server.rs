//! The HTTP intake path: accept-side admission control backed by a
//! dedicated [`WorkerPool`], in front of the core [`Router`].

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use axum::body::Bytes as AxumBytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::FutureExt;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::config::HttpConfig;
use super::context::RequestContext;
use super::error::HttpError;
use super::metrics::{BackpressureController, MetricsSnapshot};
use super::response::HttpResponse;
use super::router::Router;
use crate::runtime::RuntimeError;
use crate::util::RequestId;
use crate::worker_pool::WorkerPool;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Binds a listener, admits requests through a [`BackpressureController`],
/// and dispatches them to a [`Router`] via a dedicated [`WorkerPool`] —
/// the pool's own bounded job queue is what the spec calls the
/// `RequestMailbox`: there's no separate queue type, since `WorkerPool`
/// already is "a fixed worker count draining a bounded job queue."
#[derive(Clone)]
pub struct HttpServer {
    config: HttpConfig,
    router: Arc<Router>,
    backpressure: BackpressureController,
    pool: WorkerPool,
}

impl HttpServer {
    /// Build a server around `router`, sizing its admission controls from
    /// `config`.
    pub fn new(config: HttpConfig, router: Router) -> Self {
        let workers = config.workers();
        let queue_capacity = config.queue_capacity();
        let normal_capacity = config.normal_capacity();
        Self {
            pool: WorkerPool::new(workers, queue_capacity),
            backpressure: BackpressureController::new(normal_capacity, workers, queue_capacity),
            router: Arc::new(router),
            config,
        }
    }

    /// A snapshot of the admission-path counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.backpressure.snapshot()
    }

    /// Start the dedicated worker pool and bind `config.listen_addr()`,
    /// serving until the returned future is dropped or the process exits.
    pub async fn serve(self) -> Result<(), RuntimeError> {
        self.pool.start();
        let listener = TcpListener::bind(self.config.listen_addr())
            .await
            .map_err(|err| RuntimeError::InvalidConfig(format!("failed to bind {}: {err}", self.config.listen_addr())))?;

        let app = axum::Router::new().fallback(dispatch_entry).with_state(self);
        axum::serve(listener, app)
            .await
            .map_err(|err| RuntimeError::InvalidConfig(format!("server error: {err}")))
    }

    /// Run the full per-request admission algorithm for one already-parsed
    /// request, returning the router's response (or an admission-path
    /// rejection).
    async fn handle(&self, ctx: RequestContext) -> Result<HttpResponse, HttpError> {
        let Some(slot) = self.backpressure.try_acquire() else {
            return Err(HttpError::CapacityExceeded);
        };
        self.backpressure.record_queued();

        let (reply_tx, reply_rx) = oneshot::channel();
        let router = self.router.clone();
        let backpressure = self.backpressure.clone();
        let request_id = ctx.request_id();
        let request_id_for_job = request_id.clone();

        let job = async move {
            backpressure.record_dequeued();
            let outcome = std::panic::AssertUnwindSafe(router.dispatch(ctx))
                .catch_unwind()
                .await;
            let result = match outcome {
                Ok(result) => result,
                Err(panic) => {
                    let message = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_string());
                    warn!(request_id = %request_id_for_job, panic = %message, "handler panicked; recovered");
                    Err(HttpError::HandlerPanic(request_id_for_job))
                }
            };
            backpressure.record_completed(matches!(&result, Ok(r) if (200..300).contains(&r.status())));
            let _ = reply_tx.send(result);
            drop(slot);
        };

        if self.pool.submit(job).is_err() {
            self.backpressure.record_dequeued();
            self.backpressure.record_queue_full_rejection();
            return Err(HttpError::QueueFull);
        }

        reply_rx.await.unwrap_or_else(|_| Err(HttpError::HandlerPanic(request_id)))
    }
}

async fn dispatch_entry(
    State(server): State<HttpServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: AxumBytes,
) -> Response {
    let request_id = resolve_request_id(&headers);
    let header_map: std::collections::HashMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();

    let ctx = RequestContext::new(
        request_id.clone(),
        method.as_str(),
        uri.path(),
        std::collections::HashMap::new(),
        header_map,
        Bytes::from(body),
    );

    let result = server.handle(ctx).await;
    debug!(request_id = %request_id, "dispatched request");

    let mut response = match result {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    };

    if let Ok(value) = request_id.to_string().parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Reads `X-Request-ID` verbatim if present — any non-empty header value is
/// accepted and echoed back unchanged, not just a UUID — generating a fresh
/// id only when the header is absent.
fn resolve_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::from_header_value)
        .unwrap_or_else(RequestId::new)
}
