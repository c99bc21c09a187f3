//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::{DateTime, Local};
use std::fmt::Write as _;

const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Variables recognized in custom patterns
const CUSTOM_VARIABLES: [&str; 12] = [
    "$remote_addr",
    "$time_local",
    "$time_iso8601",
    "$request_time",
    "$request_method",
    "$request_uri",
    "$request",
    "$status",
    "$body_bytes_sent",
    "$http_range",
    "$http_referer",
    "$http_user_agent",
];

/// One served request, recorded after the response head is ready
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    pub status: u16,
    /// Declared response body size (`Content-Length`), 0 for HEAD or when
    /// unknown. A transfer that ends early is not reflected here.
    pub body_bytes: u64,
    /// Raw `Range` request header, if any
    pub range: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time to produce the response head, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            range: None,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME_FORMAT),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    /// Apache/Nginx Combined Log Format
    /// CLF followed by `"$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        let mut line = self.format_common();
        let _ = write!(
            line,
            " \"{}\" \"{}\"",
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        );
        line
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "range": self.range,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request URI with query string
    /// - `$request_time` - Processing time in seconds (3 decimal places)
    /// - `$status` - Response status code
    /// - `$body_bytes_sent` - Declared response body size
    /// - `$http_range` - Range request header
    /// - `$http_referer` - Referer header
    /// - `$http_user_agent` - User-Agent header
    ///
    /// The pattern is scanned once; substituted values are never re-scanned,
    /// so a `$` inside a client-supplied path or header stays literal.
    fn format_custom(&self, pattern: &str) -> String {
        let mut line = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            line.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            // Longest match wins: `$request_uri` over `$request`
            let name = CUSTOM_VARIABLES
                .iter()
                .filter(|name| tail.starts_with(**name))
                .max_by_key(|name| name.len());
            match name {
                Some(name) => {
                    line.push_str(&self.variable(name));
                    rest = &tail[name.len()..];
                }
                None => {
                    line.push('$');
                    rest = &tail[1..];
                }
            }
        }

        line.push_str(rest);
        line
    }

    fn variable(&self, name: &str) -> String {
        let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        match name {
            "$remote_addr" => self.remote_addr.clone(),
            "$time_local" => self.time.format(CLF_TIME_FORMAT).to_string(),
            "$time_iso8601" => self.time.to_rfc3339(),
            "$request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            "$request_method" => self.method.clone(),
            "$request_uri" => self.request_uri(),
            "$request" => format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version),
            "$status" => self.status.to_string(),
            "$body_bytes_sent" => self.body_bytes.to_string(),
            "$http_range" => or_dash(&self.range),
            "$http_referer" => or_dash(&self.referer),
            "$http_user_agent" => or_dash(&self.user_agent),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/videos/episode1.mp4".to_string(),
        );
        entry.query = Some("t=30".to_string());
        entry.status = 206;
        entry.body_bytes = 100;
        entry.range = Some("bytes=100-199".to_string());
        entry.referer = Some("http://localhost:8000/video_evaluation.html".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 12_000;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /videos/episode1.mp4?t=30 HTTP/1.1\" 206 100"));
        assert!(log.contains("\"http://localhost:8000/video_evaluation.html\""));
        assert!(log.ends_with("\"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("\"GET /videos/episode1.mp4?t=30 HTTP/1.1\" 206 100"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("Mozilla"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["status"], 206);
        assert_eq!(value["body_bytes"], 100);
        assert_eq!(value["range"], "bytes=100-199");
        assert_eq!(value["request_time_us"], 12_000);
    }

    #[test]
    fn test_format_json_missing_fields_are_null() {
        let entry = AccessLogEntry::new("10.0.0.1".into(), "HEAD".into(), "/".into());
        let value: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert!(value["range"].is_null());
        assert!(value["query"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$remote_addr $status $http_range $request_time $request");
        assert_eq!(
            log,
            "192.168.1.1 206 bytes=100-199 0.012 GET /videos/episode1.mp4?t=30 HTTP/1.1"
        );
    }

    #[test]
    fn test_format_custom_does_not_expand_values() {
        let mut entry = AccessLogEntry::new("10.0.0.1".into(), "GET".into(), "/a$status".into());
        entry.status = 404;
        entry.referer = Some("$http_user_agent".to_string());
        entry.user_agent = Some("curl".to_string());

        assert_eq!(
            entry.format("$request_uri $http_referer"),
            "/a$status $http_user_agent"
        );
    }

    #[test]
    fn test_format_custom_unknown_and_adjacent_variables() {
        let entry = create_test_entry();
        assert_eq!(entry.format("$foo $$status"), "$foo $206");
        assert_eq!(entry.format("[$request_method]$status"), "[GET]206");
    }
}
