//! URL path to filesystem path resolution
//!
//! Every servable path is confined to the canonical serving root.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Where a request path landed under the serving root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Regular file (canonical path)
    File(PathBuf),
    /// Directory (canonical path)
    Directory(PathBuf),
    NotFound,
    /// Traversal attempt or symlink leaving the root
    Forbidden,
    /// Path is not valid percent-encoded UTF-8
    BadPath,
}

/// Map a URL path (without query) onto `root`.
///
/// `root` must already be canonical. The path is percent-decoded once, `.`
/// segments are skipped, `..` and absolute components are refused before
/// touching the filesystem, and the canonical target must still start with
/// `root` so symlinks cannot escape it. A path ending in `/` never names a
/// regular file.
pub async fn resolve_path(root: &Path, request_path: &str) -> Resolved {
    let Ok(decoded) = percent_decode_str(request_path).decode_utf8() else {
        return Resolved::BadPath;
    };

    if decoded.contains('\0') {
        return Resolved::BadPath;
    }

    let relative = Path::new(decoded.trim_start_matches('/'));
    let mut target = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => target.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Resolved::Forbidden;
            }
        }
    }

    let Ok(canonical) = fs::canonicalize(&target).await else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        crate::logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        return Resolved::Forbidden;
    }

    let Ok(metadata) = fs::metadata(&canonical).await else {
        return Resolved::NotFound;
    };
    if metadata.is_dir() {
        Resolved::Directory(canonical)
    } else if metadata.is_file() {
        if decoded.ends_with('/') {
            return Resolved::NotFound;
        }
        Resolved::File(canonical)
    } else {
        Resolved::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("videos")).unwrap();
        std::fs::write(dir.path().join("videos").join("clip one.mp4"), b"data").unwrap();
        std::fs::write(dir.path().join("index.html"), b"<html></html>").unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn test_resolves_files_and_directories() {
        let (_dir, root) = fixture();

        assert_eq!(
            resolve_path(&root, "/index.html").await,
            Resolved::File(root.join("index.html"))
        );
        assert_eq!(resolve_path(&root, "/").await, Resolved::Directory(root.clone()));
        assert_eq!(
            resolve_path(&root, "/videos").await,
            Resolved::Directory(root.join("videos"))
        );
    }

    #[tokio::test]
    async fn test_percent_decoding() {
        let (_dir, root) = fixture();

        assert_eq!(
            resolve_path(&root, "/videos/clip%20one.mp4").await,
            Resolved::File(root.join("videos").join("clip one.mp4"))
        );
        assert_eq!(resolve_path(&root, "/%FF%FE").await, Resolved::BadPath);
    }

    #[tokio::test]
    async fn test_missing_paths() {
        let (_dir, root) = fixture();

        assert_eq!(resolve_path(&root, "/nope.mp4").await, Resolved::NotFound);
        assert_eq!(resolve_path(&root, "/index.html/").await, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let (_dir, root) = fixture();

        assert_eq!(resolve_path(&root, "/../etc/passwd").await, Resolved::Forbidden);
        assert_eq!(resolve_path(&root, "/videos/%2e%2e/%2e%2e/x").await, Resolved::Forbidden);
        assert_eq!(resolve_path(&root, "/./index.html").await, Resolved::File(root.join("index.html")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_forbidden() {
        let (_dir, root) = fixture();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("escape")).unwrap();

        assert_eq!(
            resolve_path(&root, "/escape/secret.txt").await,
            Resolved::Forbidden
        );
    }
}
