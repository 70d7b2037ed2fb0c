//! Static file serving module
//!
//! Handles static file loading, MIME type detection, and response building.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a file from a directory
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(dir, ctx.path, route_prefix, index_files).await {
        Some((content, content_type)) => build_static_file_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            ctx.range_header.as_deref(),
        ),
        None => http::build_404_response(),
    }
}

/// Load static file from directory with index file support
///
/// The resolved path is canonicalized and must stay inside the canonical
/// base directory; anything that escapes it is treated as not found.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    // Remove route prefix from path
    let prefix_clean = route_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path.as_str()
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or(&clean_path)
    };

    let mut file_path = Path::new(static_dir).join(relative_path);

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Check if path is a directory, try index files
    if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.exists() && index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    // Determine content type from extension
    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build static file response with `ETag` and Range support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    // Check for Range request
    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            return http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                is_head,
            );
        }
        RangeParseResult::NotSatisfiable => {
            return http::build_416_response(total_size);
        }
        RangeParseResult::None => {
            // No Range header or malformed, return full content
        }
    }

    // Full response
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data.to_owned())
    };

    http::response::build_cached_response(body, content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_returns_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("datos.csv"), b"a,b\n1,2\n").unwrap();
        let base = dir.path().to_str().unwrap();

        let (content, content_type) =
            load_from_directory(base, "/archivos/datos.csv", "/archivos", &[])
                .await
                .expect("file should load");
        assert_eq!(content, b"a,b\n1,2\n");
        assert_eq!(content_type, "text/csv");
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_str().unwrap();

        let loaded = load_from_directory(base, "/archivos/nope.py", "/archivos", &[]).await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_str().unwrap();

        // An absolute path smuggled past the prefix strip must not escape
        // the base directory
        let path = format!("/archivos/..{}/secret.txt", outside.path().display());
        let loaded = load_from_directory(base, &path, "/archivos", &[]).await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_index_file_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<h1>hola</h1>").unwrap();
        let base = dir.path().to_str().unwrap();
        let index_files = vec!["index.html".to_string()];

        let (content, content_type) = load_from_directory(base, "/", "", &index_files)
            .await
            .expect("index should resolve");
        assert_eq!(content, b"<h1>hola</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }
}
