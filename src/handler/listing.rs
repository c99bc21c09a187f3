//! HTML directory listing

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters escaped in listing hrefs
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'\'');

struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

/// Render a listing of `dir` titled with the decoded `request_path`.
///
/// Entries are sorted case-insensitively. Directories are suffixed with `/`
/// and symlinks with `@` in the visible name.
pub async fn render_directory_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        // Follow symlinks so a link to a directory is linked with a slash
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());

    let display_path = percent_encoding::percent_decode_str(request_path).decode_utf8_lossy();
    let title = format!("Directory listing for {}", escape_html(&display_path));

    let mut html = String::with_capacity(512 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in &entries {
        let mut display = entry.name.clone();
        let mut href = utf8_percent_encode(&entry.name, HREF).to_string();
        if entry.is_dir {
            display.push('/');
            href.push('/');
        }
        if entry.is_symlink {
            display.push('@');
        }
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&href),
            escape_html(&display)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Minimal HTML escaping (sufficient for filenames)
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_sorted_with_markers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("A.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("clips")).unwrap();

        let html = render_directory_listing(dir.path(), "/media/").await.unwrap();

        assert!(html.contains("<title>Directory listing for /media/</title>"));
        let a = html.find("A.txt").unwrap();
        let b = html.find("b.mp4").unwrap();
        let clips = html.find("clips/").unwrap();
        assert!(a < b && b < clips);
        assert!(html.contains("<a href=\"clips/\">clips/</a>"));
    }

    #[tokio::test]
    async fn test_names_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("<b> & 'x'.txt"), b"").unwrap();

        let html = render_directory_listing(dir.path(), "/").await.unwrap();

        assert!(html.contains("&lt;b&gt; &amp; &#x27;x&#x27;.txt"));
        assert!(html.contains("href=\"%3Cb%3E%20&amp;%20%27x%27.txt\""));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_directory_listing(&dir.path().join("gone"), "/gone/")
            .await
            .is_err());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a\"b"), "a&quot;b");
        assert_eq!(escape_html("plain"), "plain");
    }
}
