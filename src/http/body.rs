//! Response body types
//!
//! Small responses are buffered; file contents are streamed straight from an
//! open handle so large media never has to fit in memory.

use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

/// Body type of every response produced by this server
pub type ResponseBody = BoxBody<Bytes, io::Error>;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Buffered body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Body with no content
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Streams at most `length` bytes from the current position of `file`.
///
/// The handle is owned by the body, so it is closed as soon as hyper drops the
/// body: after the last frame, or when the transfer fails midway. If the file
/// shrinks underneath us the stream simply ends early.
pub fn file(file: File, length: u64) -> ResponseBody {
    let stream = ReaderStream::with_capacity(file.take(length), READ_CHUNK_SIZE);
    StreamBody::new(stream.map_ok(Frame::data)).boxed()
}
