//! Response emission
//!
//! Serves the concatenated content as if it were a single static file named
//! after the first requested file.

use super::{ComboError, Concatenated};
use crate::handler::RequestContext;
use crate::http::{self, conditional, mime, range::RangeParseResult, Precondition};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::Response;

/// Build the success response for `combined`, honouring conditional and range headers
pub fn emit(
    ctx: &RequestContext<'_>,
    first_name: &str,
    combined: Concatenated,
) -> Response<Full<Bytes>> {
    let Concatenated {
        body,
        last_modified,
    } = combined;
    let modified = conditional::last_modified_header(last_modified);

    let honor_range = match conditional::evaluate(&ctx.conditions, last_modified) {
        Precondition::Failed => return http::build_412_response(),
        Precondition::NotModified => return http::build_304_response(modified.as_deref()),
        Precondition::Proceed { honor_range } => honor_range,
    };

    let content_type = mime::content_type(first_name, &body);
    let range_header = ctx.range_header.filter(|_| honor_range);

    match http::parse_range_header(range_header, body.len()) {
        RangeParseResult::Valid(range) => {
            let end = range.end_position(body.len());
            http::build_partial_response(
                &body,
                content_type,
                modified.as_deref(),
                range.start,
                end,
                ctx.is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(body.len()),
        RangeParseResult::None => {
            http::build_content_response(body, content_type, modified.as_deref(), ctx.is_head)
        }
    }
}

/// Build the plain-text response for a failed request
pub fn error_response(err: &ComboError) -> Response<Full<Bytes>> {
    let mut response = http::build_error_response(err.status(), &err.public_message());
    if matches!(err, ComboError::MethodNotAllowed) {
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
    }
    response
}
