//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.

use super::body::{self, ResponseBody};
use super::range::ByteRange;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE,
    LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};

/// Partial responses must never be reused by intermediate caches
pub const PARTIAL_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

/// Build 200 OK response for a whole file
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    last_modified: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes");

    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(body::empty())
    })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    body: ResponseBody,
    content_type: &str,
    range: ByteRange,
    total_size: u64,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_RANGE, range.content_range(total_size))
        .header(CONTENT_LENGTH, range.len())
        .header(ACCEPT_RANGES, "bytes")
        .header(CACHE_CONTROL, PARTIAL_CACHE_CONTROL)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(body::empty())
        })
}

/// Build 416 Range Not Satisfiable response (no body)
pub fn build_416_response(file_size: u64) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(body::empty())
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body::empty())
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(target: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, target)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(body::empty())
        })
}

/// Build 204 response for OPTIONS (preflight) requests
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Headers", "Range")
        .header("Access-Control-Max-Age", "86400")
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(body::empty())
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(is_head: bool) -> Response<ResponseBody> {
    build_plain_error(StatusCode::BAD_REQUEST, "400 Bad Request", is_head)
}

/// Build 403 Forbidden response
pub fn build_403_response(is_head: bool) -> Response<ResponseBody> {
    build_plain_error(StatusCode::FORBIDDEN, "403 Forbidden", is_head)
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<ResponseBody> {
    build_plain_error(StatusCode::NOT_FOUND, "404 Not Found", is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let mut response = build_plain_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "405 Method Not Allowed",
        false,
    );
    response
        .headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static("GET, HEAD, OPTIONS"));
    response
}

fn build_plain_error(status: StatusCode, message: &'static str, is_head: bool) -> Response<ResponseBody> {
    let body = if is_head {
        body::empty()
    } else {
        body::full(message)
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len())
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(body::empty())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_headers() {
        let range = ByteRange { start: 100, end: 199 };
        let response = build_partial_response(body::empty(), "video/mp4", range, 1000);

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[CONTENT_RANGE], "bytes 100-199/1000");
        assert_eq!(headers[CONTENT_LENGTH], "100");
        assert_eq!(headers[ACCEPT_RANGES], "bytes");
        assert_eq!(headers[CACHE_CONTROL], PARTIAL_CACHE_CONTROL);
        assert_eq!(headers[CONTENT_TYPE], "video/mp4");
    }

    #[test]
    fn test_416_has_no_body() {
        let response = build_416_response(1000);
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(response.headers()[CONTENT_RANGE], "bytes */1000");
        assert_eq!(response.headers()[CONTENT_LENGTH], "0");
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let response = build_405_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }
}
