//! Route matching (`:param` capture) and middleware chain composition.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::context::RequestContext;
use super::error::HttpError;
use super::response::HttpResponse;

/// Future returned by a [`Handler`] or a wrapped middleware chain.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send>>;

/// A route handler, or the result of wrapping one in middleware.
pub type Handler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// Transforms a handler into a new handler that runs additional logic
/// around it. `middleware(handler)` must call through to `handler` to
/// continue the chain; failing to do so short-circuits the request.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

struct Route {
    method: String,
    segments: Vec<Segment>,
    middleware: Vec<Middleware>,
    handler: Handler,
}

#[derive(Clone)]
enum Segment {
    Literal(String),
    Param(String),
}

fn parse_segments(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(s.to_string()),
        })
        .collect()
}

fn match_segments(route: &[Segment], path: &str) -> Option<HashMap<String, String>> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != route.len() {
        return None;
    }
    let mut params = HashMap::new();
    for (segment, part) in route.iter().zip(parts.iter()) {
        match segment {
            Segment::Literal(literal) => {
                if literal != part {
                    return None;
                }
            }
            Segment::Param(name) => {
                params.insert(name.clone(), (*part).to_string());
            }
        }
    }
    Some(params)
}

/// Matches method + path against registered routes and composes each
/// route's middleware chain with the global chain at registration time.
///
/// Call order for a matched route is: global middleware (outermost, in
/// registration order), then route-specific middleware (innermost, in
/// registration order), then the handler.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    global_middleware: Vec<Middleware>,
}

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register middleware that wraps every route, outermost-first in the
    /// order added.
    pub fn with_global_middleware(mut self, middleware: Middleware) -> Self {
        self.global_middleware.push(middleware);
        self
    }

    /// Register a route. `path` may contain `:name` segments, captured
    /// into [`RequestContext::params`].
    pub fn route(
        &mut self,
        method: impl Into<String>,
        path: &str,
        handler: Handler,
        middleware: Vec<Middleware>,
    ) {
        self.routes.push(Route {
            method: method.into().to_uppercase(),
            segments: parse_segments(path),
            middleware,
            handler,
        });
    }

    /// Match `method`/`path`, returning the composed handler and captured
    /// params, or `None` if nothing matches.
    fn find(&self, method: &str, path: &str) -> Option<(Handler, HashMap<String, String>)> {
        for route in &self.routes {
            if route.method != method {
                continue;
            }
            if let Some(params) = match_segments(&route.segments, path) {
                let chain: Vec<Middleware> = self
                    .global_middleware
                    .iter()
                    .cloned()
                    .chain(route.middleware.iter().cloned())
                    .collect();
                let composed = chain.iter().rev().fold(route.handler.clone(), |acc, mw| mw(acc));
                return Some((composed, params));
            }
        }
        None
    }

    /// Dispatch a request: match against registered routes and run the
    /// composed handler, or return `HttpError::NotFound`.
    pub async fn dispatch(&self, mut ctx: RequestContext) -> Result<HttpResponse, HttpError> {
        let Some((handler, params)) = self.find(ctx.method(), ctx.path()) else {
            return Err(HttpError::NotFound);
        };
        ctx = ctx.with_params(params);
        handler(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::RequestId;
    use bytes::Bytes;
    use parking_lot::Mutex;

    fn handler(response: &'static str) -> Handler {
        Arc::new(move |_ctx| Box::pin(async move { Ok(HttpResponse::ok(Bytes::from_static(response.as_bytes()))) }))
    }

    fn ctx(method: &str, path: &str) -> RequestContext {
        RequestContext::new(RequestId::new(), method, path, HashMap::new(), HashMap::new(), Bytes::new())
    }

    #[tokio::test]
    async fn literal_route_matches_exactly() {
        let mut router = Router::new();
        router.route("GET", "/health", handler("ok"), vec![]);
        let response = router.dispatch(ctx("GET", "/health")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn param_segment_is_captured() {
        let mut router = Router::new();
        router.route(
            "GET",
            "/users/:id",
            Arc::new(|ctx: RequestContext| {
                Box::pin(async move { Ok(HttpResponse::ok(Bytes::from(ctx.param("id").unwrap().to_string()))) })
            }),
            vec![],
        );
        let response = router.dispatch(ctx("GET", "/users/42")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"42");
    }

    #[tokio::test]
    async fn unmatched_route_is_not_found() {
        let router = Router::new();
        let result = router.dispatch(ctx("GET", "/nope")).await;
        assert!(matches!(result, Err(HttpError::NotFound)));
    }

    #[tokio::test]
    async fn method_mismatch_is_not_found() {
        let mut router = Router::new();
        router.route("GET", "/health", handler("ok"), vec![]);
        let result = router.dispatch(ctx("POST", "/health")).await;
        assert!(matches!(result, Err(HttpError::NotFound)));
    }

    #[tokio::test]
    async fn middleware_runs_global_outermost_then_route_then_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let make_mw = |name: &'static str, log: Arc<Mutex<Vec<&'static str>>>| -> Middleware {
            Arc::new(move |inner: Handler| {
                let log = log.clone();
                Arc::new(move |ctx: RequestContext| {
                    let inner = inner.clone();
                    let log = log.clone();
                    Box::pin(async move {
                        log.lock().push(name);
                        inner(ctx).await
                    })
                })
            })
        };

        let mut router = Router::new();
        router = router.with_global_middleware(make_mw("g1", log.clone()));
        router = router.with_global_middleware(make_mw("g2", log.clone()));

        let log_for_handler = log.clone();
        let h: Handler = Arc::new(move |_ctx| {
            let log = log_for_handler.clone();
            Box::pin(async move {
                log.lock().push("handler");
                Ok(HttpResponse::ok(Bytes::new()))
            })
        });

        router.route("GET", "/chain", h, vec![make_mw("r1", log.clone())]);

        router.dispatch(ctx("GET", "/chain")).await.unwrap();
        assert_eq!(*log.lock(), vec!["g1", "g2", "r1", "handler"]);
    }
}
