use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const UNMATCHED_ROUTE: &str = "<unmatched>";

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
    /// Route template that served the request, e.g. `/api/v1/posts/{slug}`.
    pub route: Option<String>,
}

impl RequestContext {
    pub fn route_label(&self) -> &str {
        self.route.as_deref().unwrap_or(UNMATCHED_ROUTE)
    }
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let ctx = RequestContext {
        request_id: request_id.clone(),
        route: request
            .extensions()
            .get::<MatchedPath>()
            .map(|path| path.as_str().to_string()),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);
    response
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let (request_id, route) = match request.extensions().get::<RequestContext>() {
        Some(ctx) => (ctx.request_id.clone(), ctx.route_label().to_string()),
        None => (String::new(), UNMATCHED_ROUTE.to_string()),
    };

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    if !(status.is_client_error() || status.is_server_error()) {
        debug!(
            target = "postline::http::access",
            status = status.as_u16(),
            method = %method,
            route = %route,
            elapsed_ms = elapsed_ms,
            request_id = request_id,
            "request served",
        );
        return response;
    }

    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .cloned()
        .unwrap_or_else(|| "no diagnostic available".to_string());

    if status.is_server_error() {
        error!(
            target = "postline::http::access",
            status = status.as_u16(),
            method = %method,
            route = %route,
            path = %uri.path(),
            query = uri.query().unwrap_or(""),
            elapsed_ms = elapsed_ms,
            source = source,
            detail = %detail,
            chain = ?messages,
            request_id = request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "postline::http::access",
            status = status.as_u16(),
            method = %method,
            route = %route,
            path = %uri.path(),
            query = uri.query().unwrap_or(""),
            elapsed_ms = elapsed_ms,
            detail = %detail,
            request_id = request_id,
            "request rejected",
        );
    }

    response
}
