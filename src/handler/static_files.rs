//! Static file serving module
//!
//! `DirectoryServer` is the general-purpose static file server: it resolves
//! URL paths under the serving root, serves whole files, index files and
//! directory listings, and decorates every response with the configured
//! headers. Range handling lives in [`super::ranged`] and only borrows these
//! capabilities through the [`StaticFiles`] trait.

use super::listing;
use super::resolve::{self, Resolved};
use crate::config::Config;
use crate::error::ServerError;
use crate::http::{self, body, mime, ResponseBody};
use crate::logger;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::Response;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// Request information needed for serving
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    /// `Range` header, if present and valid ASCII
    pub range_header: Option<&'a str>,
}

/// Capabilities of a static file server that the range responder builds on
#[async_trait]
pub trait StaticFiles: Send + Sync {
    /// Map a URL path onto the serving root
    async fn resolve(&self, request_path: &str) -> Resolved;

    /// Serve a resolved path in full (files, directories, errors)
    async fn serve_full(&self, ctx: &RequestContext<'_>, resolved: &Resolved) -> Response<ResponseBody>;

    /// Add headers that every response carries
    fn augment_headers(&self, headers: &mut HeaderMap);
}

/// Serves a directory tree
#[derive(Debug, Clone)]
pub struct DirectoryServer {
    root: PathBuf,
    index_files: Vec<String>,
    directory_listing: bool,
    cors_allow_origin: Option<HeaderValue>,
    server_name: Option<HeaderValue>,
}

impl DirectoryServer {
    /// Bind to `root`, which must exist and be a directory.
    pub fn new(root: &Path) -> Result<Self, ServerError> {
        let canonical = root.canonicalize().map_err(|source| ServerError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(ServerError::RootNotDirectory(canonical));
        }

        Ok(Self {
            root: canonical,
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            directory_listing: true,
            cors_allow_origin: Some(HeaderValue::from_static("*")),
            server_name: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let mut server = Self::new(&config.serve.root)?;
        server.index_files.clone_from(&config.serve.index_files);
        server.directory_listing = config.serve.directory_listing;
        server.cors_allow_origin = header_value("http.cors_allow_origin", &config.http.cors_allow_origin);
        server.server_name = header_value("http.server_name", &config.http.server_name);
        Ok(server)
    }

    /// Canonical serving root
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn with_directory_listing(mut self, enabled: bool) -> Self {
        self.directory_listing = enabled;
        self
    }

    async fn serve_directory(&self, ctx: &RequestContext<'_>, dir: &Path) -> Response<ResponseBody> {
        // Relative links in the page only work with a trailing slash
        if !ctx.path.ends_with('/') {
            let target = match ctx.query {
                Some(q) => format!("{}/?{q}", ctx.path),
                None => format!("{}/", ctx.path),
            };
            return http::build_redirect_response(&target);
        }

        for index in &self.index_files {
            let candidate = dir.join(index);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                return serve_whole_file(&candidate, ctx.is_head).await;
            }
        }

        if !self.directory_listing {
            return http::build_403_response(ctx.is_head);
        }

        match listing::render_directory_listing(dir, ctx.path).await {
            Ok(html) => http::response::build_html_response(html, ctx.is_head),
            Err(e) => {
                logger::log_warning(&format!("No permission to list directory '{}': {e}", dir.display()));
                http::build_404_response(ctx.is_head)
            }
        }
    }
}

#[async_trait]
impl StaticFiles for DirectoryServer {
    async fn resolve(&self, request_path: &str) -> Resolved {
        resolve::resolve_path(&self.root, request_path).await
    }

    async fn serve_full(&self, ctx: &RequestContext<'_>, resolved: &Resolved) -> Response<ResponseBody> {
        match resolved {
            Resolved::File(path) => serve_whole_file(path, ctx.is_head).await,
            Resolved::Directory(dir) => self.serve_directory(ctx, dir).await,
            Resolved::NotFound => http::build_404_response(ctx.is_head),
            Resolved::Forbidden => http::build_403_response(ctx.is_head),
            Resolved::BadPath => http::build_400_response(ctx.is_head),
        }
    }

    fn augment_headers(&self, headers: &mut HeaderMap) {
        if let Some(origin) = &self.cors_allow_origin {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
        if let Some(name) = &self.server_name {
            headers.insert(SERVER, name.clone());
        }
    }
}

/// Stream an entire file with status 200
async fn serve_whole_file(path: &Path, is_head: bool) -> Response<ResponseBody> {
    let file = match fs::File::open(path).await {
        Ok(f) => f,
        Err(e) => {
            logger::log_error(&format!("Failed to open file '{}': {e}", path.display()));
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                return http::build_403_response(is_head);
            }
            return http::build_404_response(is_head);
        }
    };

    // Size and mtime come from the open handle, so they describe what we stream
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!("Failed to stat file '{}': {e}", path.display()));
            return http::build_404_response(is_head);
        }
    };

    let size = metadata.len();
    let last_modified = metadata.modified().ok().map(format_http_date);
    let body = if is_head {
        body::empty()
    } else {
        body::file(file, size)
    };

    http::response::build_file_response(
        body,
        &mime::get_content_type(path),
        size,
        last_modified.as_deref(),
    )
}

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Empty values disable the header
fn header_value(key: &str, value: &str) -> Option<HeaderValue> {
    if value.is_empty() {
        return None;
    }
    match HeaderValue::from_str(value) {
        Ok(v) => Some(v),
        Err(e) => {
            logger::log_warning(&format!("Ignoring invalid header value for {key}: {e}"));
            None
        }
    }
}
