//! Script execution endpoint
//!
//! Accepts `{"file": "<name>"}`, runs the configured interpreter against the
//! named script in the scripts directory, and answers with the captured
//! output.

use crate::config::AppState;
use crate::executor::{self, ExecOutcome};
use crate::http;
use crate::logger;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Request body for the execute endpoint
#[derive(Debug, Deserialize)]
struct ExecuteRequest {
    file: String,
}

/// Handle `POST /ejecutar`
///
/// Both outcome branches answer 200; the body carries either `{"output"}`
/// or `{"error"}`. Only an unreadable or malformed request body is a client
/// error (400).
pub async fn handle_execute(
    req: Request<Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return http::build_400_response("failed to read request body");
        }
    };

    let exec_req: ExecuteRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            logger::log_warning(&format!("Invalid execute request body: {e}"));
            return http::build_400_response(&format!("invalid JSON body: {e}"));
        }
    };

    // The filename is joined verbatim onto the scripts directory: the caller
    // names the script, the server runs it.
    let script_path = Path::new(&state.config.resources.files_dir).join(&exec_req.file);

    logger::log_exec_start(&exec_req.file, &state.config.executor.interpreter);
    let started = Instant::now();
    let outcome = executor::run_script(&state.config.executor.interpreter, &script_path).await;
    logger::log_exec_finished(&exec_req.file, outcome.is_success(), started.elapsed());

    http::build_json_response(StatusCode::OK, outcome_json(&outcome))
}

/// Serialize an outcome into the response body: `{"output"}` on success,
/// `{"error"}` on failure, never both.
fn outcome_json(outcome: &ExecOutcome) -> String {
    match outcome {
        ExecOutcome::Success { stdout } => serde_json::json!({ "output": stdout }).to_string(),
        ExecOutcome::Failure { stderr } => serde_json::json!({ "error": stderr }).to_string(),
    }
}
