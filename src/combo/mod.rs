//! Combined file serving
//!
//! A combo request names several files in its query string, e.g.
//! `/combo?base.css&pure/grids.css`, and receives their contents concatenated in
//! request order. Handling runs strictly in sequence:
//!
//! 1. [`parse_file_list`] validates the request into a [`FileList`]
//! 2. [`concatenate`] reads every file from the [`FileStore`](crate::store::FileStore)
//! 3. [`emit`] writes the response, with conditional and range support
//!
//! Any failure ends the request with a plain-text error; no partial content is
//! ever sent.

mod concat;
mod emit;
mod error;
mod request;

pub use concat::{concatenate, Concatenated};
pub use emit::{emit, error_response};
pub use error::ComboError;
pub use request::{parse_file_list, FileList};

use crate::config::ComboConfig;
use crate::handler::RequestContext;
use crate::store::FileStore;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Run the whole pipeline for one request
pub async fn serve(
    ctx: &RequestContext<'_>,
    conf: &ComboConfig,
    store: &dyn FileStore,
) -> Response<Full<Bytes>> {
    let result = async {
        let files = parse_file_list(ctx.method, ctx.path, ctx.query, conf)?;
        let combined = concatenate(&files, store).await?;
        Ok::<_, ComboError>(emit(ctx, files.first(), combined))
    }
    .await;

    result.unwrap_or_else(|err| error_response(&err))
}
