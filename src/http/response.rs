//! HTTP response building module
//!
//! Provides builders for the responses a combined file can produce, decoupled from
//! request handling. Builders never panic: a builder error is logged and a bare
//! response is returned instead.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build plain-text error response
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = Bytes::from(format!("{message}\n"));
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .header("Content-Length", body.len())
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status, body)
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: Option<&str>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(304);
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", modified);
    }
    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("304", &e);
        fallback(StatusCode::NOT_MODIFIED, Bytes::new())
    })
}

/// Build 412 Precondition Failed response
pub fn build_412_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(412)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("412", &e);
            fallback(StatusCode::PRECONDITION_FAILED, Bytes::new())
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{total_size}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            fallback(
                StatusCode::RANGE_NOT_SATISFIABLE,
                Bytes::from("Range Not Satisfiable"),
            )
        })
}

/// Build 200 response with the full content
pub fn build_content_response(
    data: Bytes,
    content_type: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes");
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", modified);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        fallback(StatusCode::OK, Bytes::new())
    })
}

/// Build 206 Partial Content response for `data[start..=end]`
pub fn build_partial_response(
    data: &Bytes,
    content_type: &str,
    last_modified: Option<&str>,
    start: usize,
    end: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let total_size = data.len();
    let content_length = end - start + 1;
    let body = if is_head {
        Bytes::new()
    } else {
        data.slice(start..=end)
    };

    let mut builder = Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes");
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", modified);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("206", &e);
        fallback(StatusCode::PARTIAL_CONTENT, Bytes::new())
    })
}

fn fallback(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
