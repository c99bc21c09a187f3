//! Range-aware responder
//!
//! Wraps any [`StaticFiles`] implementation and answers single byte-range
//! requests for regular files with `206 Partial Content`. Every other request
//! is delegated unchanged to the wrapped server.
//!
//! ```text
//! resolve ─┬─ not a file / no Range ──────────────► serve_full
//!          └─ Range ─ evaluate ─┬─ Unsupported ───► serve_full
//!                               ├─ Fault ─────────► serve_full (logged)
//!                               ├─ OutOfRange ────► 416
//!                               └─ Satisfiable ───► 206
//! ```

use super::resolve::Resolved;
use super::static_files::{RequestContext, StaticFiles};
use crate::http::range::{self, ByteRange};
use crate::http::{self, body, mime, ResponseBody};
use crate::logger;
use hyper::Response;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncSeekExt;

/// Result of evaluating a `Range` header against a file
#[derive(Debug)]
pub enum RangeOutcome {
    /// File opened and positioned at `range.start`
    Satisfiable(PartialContent),
    /// Header does not match `bytes=<start>-<end?>`
    Unsupported,
    /// Header is well formed but does not fit the file
    OutOfRange { file_size: u64 },
    /// I/O failure while inspecting or opening the file
    Fault(io::Error),
}

/// An open file plus the window to stream from it
#[derive(Debug)]
pub struct PartialContent {
    file: File,
    pub range: ByteRange,
    pub file_size: u64,
}

impl PartialContent {
    fn into_response(self, content_type: &str, is_head: bool) -> Response<ResponseBody> {
        let body = if is_head {
            // Dropping the handle here closes it
            body::empty()
        } else {
            body::file(self.file, self.range.len())
        };
        http::response::build_partial_response(body, content_type, self.range, self.file_size)
    }
}

/// Evaluate `header` against the file at `path`.
///
/// The size is read fresh on every call. A file that shrinks after this point
/// makes the body end early; nothing is locked.
pub async fn evaluate_range(path: &Path, header: &str) -> RangeOutcome {
    let Some(spec) = range::parse_range_header(header) else {
        return RangeOutcome::Unsupported;
    };

    let file_size = match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        Ok(_) => return RangeOutcome::Unsupported,
        Err(e) => return RangeOutcome::Fault(e),
    };

    let byte_range = match spec.resolve(file_size) {
        Ok(r) => r,
        Err(not_satisfiable) => {
            return RangeOutcome::OutOfRange {
                file_size: not_satisfiable.file_size,
            }
        }
    };

    match open_at(path, byte_range.start).await {
        Ok(file) => RangeOutcome::Satisfiable(PartialContent {
            file,
            range: byte_range,
            file_size,
        }),
        Err(e) => RangeOutcome::Fault(e),
    }
}

async fn open_at(path: &Path, offset: u64) -> io::Result<File> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;
    Ok(file)
}

/// Answer one request, honoring a single byte range when possible.
///
/// Headers from [`StaticFiles::augment_headers`] are added on every branch.
pub async fn respond<S>(files: &S, ctx: &RequestContext<'_>) -> Response<ResponseBody>
where
    S: StaticFiles + ?Sized,
{
    let resolved = files.resolve(ctx.path).await;

    let mut response = match (&resolved, ctx.range_header) {
        (Resolved::File(path), Some(header)) => match evaluate_range(path, header).await {
            RangeOutcome::Satisfiable(partial) => {
                partial.into_response(&mime::get_content_type(path), ctx.is_head)
            }
            RangeOutcome::OutOfRange { file_size } => http::build_416_response(file_size),
            RangeOutcome::Unsupported => files.serve_full(ctx, &resolved).await,
            RangeOutcome::Fault(e) => {
                logger::log_warning(&format!(
                    "Error handling range request for '{}': {e}",
                    path.display()
                ));
                files.serve_full(ctx, &resolved).await
            }
        },
        _ => files.serve_full(ctx, &resolved).await,
    };

    files.augment_headers(response.headers_mut());
    response
}
