//! Request handling entry point
//!
//! Builds the per-request context, runs the combo pipeline and writes the access log.

use crate::combo;
use crate::config::AppState;
use crate::http::Conditions;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName};
use hyper::http::request::Parts;
use hyper::{header, Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Raw (still percent-encoded) query string
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub conditions: Conditions<'a>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(parts: &'a Parts) -> Self {
        let headers = &parts.headers;
        Self {
            method: &parts.method,
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            conditions: Conditions {
                if_match: header_str(headers, &header::IF_MATCH),
                if_unmodified_since: header_str(headers, &header::IF_UNMODIFIED_SINCE),
                if_none_match: header_str(headers, &header::IF_NONE_MATCH),
                if_modified_since: header_str(headers, &header::IF_MODIFIED_SINCE),
                if_range: header_str(headers, &header::IF_RANGE),
            },
            range_header: header_str(headers, &header::RANGE),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; combo requests are GET or HEAD.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let ctx = RequestContext::from_parts(&parts);
    let response = combo::serve(&ctx, &state.config.combo, state.store.as_ref()).await;

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    format: &str,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_str(&parts.headers, &header::REFERER).map(ToString::to_string);
    entry.user_agent = header_str(&parts.headers, &header::USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, format);
}
