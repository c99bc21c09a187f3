//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type for a file path
///
/// Text types are served as UTF-8.
///
/// # Examples
/// ```
/// use range_server::http::mime::get_content_type;
/// use std::path::Path;
///
/// assert_eq!(get_content_type(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Path::new("clip.mp4")), "video/mp4");
/// assert_eq!(get_content_type(Path::new("blob")), "application/octet-stream");
/// ```
pub fn get_content_type(path: &Path) -> String {
    let Some(mime) = mime_guess::from_path(path).first() else {
        return DEFAULT_CONTENT_TYPE.to_string();
    };

    if mime.type_() == mime_guess::mime::TEXT && mime.get_param("charset").is_none() {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_type(name: &str) -> String {
        get_content_type(Path::new(name))
    }

    #[test]
    fn test_common_types() {
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("style.css"), "text/css; charset=utf-8");
        assert_eq!(content_type("data.json"), "application/json");
        assert_eq!(content_type("logo.png"), "image/png");
        assert_eq!(content_type("episode.mp4"), "video/mp4");
        assert_eq!(content_type("episode.webm"), "video/webm");
    }

    #[test]
    fn test_case_insensitive_extension() {
        assert_eq!(content_type("MOVIE.MP4"), "video/mp4");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type("file.xyzzy"), "application/octet-stream");
        assert_eq!(content_type("README"), "application/octet-stream");
    }
}
