//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::{execute, static_files};
use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes, Incoming};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    // Captured up front: the execute handler consumes the request body
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version());
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let mut response = dispatch(req, &state).await;

    // Advertise the configured server name on every response
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(hyper::header::SERVER, value);
    }

    if state.config.logging.access_log {
        let mut entry =
            AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes =
            usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(0);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route the request to one of the three surfaces
async fn dispatch(req: Request<Incoming>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    match method {
        Method::POST if path == "/ejecutar" => execute::handle_execute(req, state).await,
        // POST anywhere else matches no route
        Method::POST => http::build_404_response(),
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: header_string(&req, "if-none-match"),
                range_header: header_string(&req, "range"),
            };
            let resources = &state.config.resources;
            if path.starts_with("/archivos/") {
                static_files::serve_directory(&ctx, &resources.files_dir, "/archivos", &[]).await
            } else {
                static_files::serve_directory(
                    &ctx,
                    &resources.public_dir,
                    "",
                    &resources.index_files,
                )
                .await
            }
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Extract a header as an owned string
fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Render the HTTP version the way access log formats expect it
fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
