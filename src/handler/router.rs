//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, range-aware serving and access logging.

use super::ranged;
use super::static_files::{RequestContext, StaticFiles};
use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{CONTENT_LENGTH, RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Never fails: every outcome, including I/O faults, is a response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let uri = req.uri();
    let logging = &state.config.logging;

    logger::log_request(method, uri, req.version());
    logger::log_headers_count(req.headers().len(), logging.show_headers);

    let response = match check_http_method(method) {
        Some(mut resp) => {
            state.files.augment_headers(resp.headers_mut());
            resp
        }
        None => {
            let ctx = RequestContext {
                path: uri.path(),
                query: uri.query(),
                is_head: *method == Method::HEAD,
                range_header: header_str(&req, RANGE),
            };
            ranged::respond(&state.files, &ctx).await
        }
    };

    if logging.access_log {
        let entry = build_access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_str<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn build_access_entry<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format_version(req.version()).to_string();
    entry.status = response.status().as_u16();
    // Declared length, not bytes written: a body cut short is still logged in full
    entry.body_bytes = if *req.method() == Method::HEAD {
        0
    } else {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.range = header_str(req, RANGE).map(ToString::to_string);
    entry.referer = header_str(req, REFERER).map(ToString::to_string);
    entry.user_agent = header_str(req, USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn format_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_RANGE};
    use hyper::StatusCode;

    fn state() -> (tempfile::TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("video.mp4"), vec![1u8; 1000]).unwrap();
        let mut config = Config::default();
        config.serve.root = dir.path().to_path_buf();
        config.logging.access_log = false;
        (dir, Arc::new(AppState::new(config).unwrap()))
    }

    fn request(method: Method, uri: &str, range: Option<&str>) -> Request<Empty<Bytes>> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(range) = range {
            builder = builder.header(RANGE, range);
        }
        builder.body(Empty::new()).unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_with_range() {
        let (_dir, state) = state();
        let req = request(Method::GET, "/video.mp4", Some("bytes=100-199"));
        let response = handle_request(req, state, peer()).await.unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[CONTENT_RANGE], "bytes 100-199/1000");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.len(), 100);
    }

    #[tokio::test]
    async fn test_options_and_disallowed_methods_carry_cors() {
        let (_dir, state) = state();

        let req = request(Method::OPTIONS, "/video.mp4", None);
        let response = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let req = request(Method::POST, "/video.mp4", None);
        let response = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD, OPTIONS");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_access_entry() {
        let req = request(Method::GET, "/video.mp4?t=3", Some("bytes=0-9"));
        let response = http::response::build_partial_response(
            crate::http::body::empty(),
            "video/mp4",
            crate::http::ByteRange { start: 0, end: 9 },
            1000,
        );
        let entry = build_access_entry(&req, &response, peer(), Instant::now());

        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.query.as_deref(), Some("t=3"));
        assert_eq!(entry.status, 206);
        assert_eq!(entry.body_bytes, 10);
        assert_eq!(entry.range.as_deref(), Some("bytes=0-9"));
    }

    #[test]
    fn test_access_entry_head_sends_no_body() {
        let req = request(Method::HEAD, "/video.mp4", Some("bytes=0-9"));
        let response = http::response::build_partial_response(
            crate::http::body::empty(),
            "video/mp4",
            crate::http::ByteRange { start: 0, end: 9 },
            1000,
        );
        let entry = build_access_entry(&req, &response, peer(), Instant::now());

        assert_eq!(entry.status, 206);
        assert_eq!(entry.body_bytes, 0);
    }
}
