//! Asynchronous HTTP server that serves a scripts directory, executes the
//! named script through an external interpreter, and serves a public asset
//! tree for everything else.

pub mod config;
pub mod executor;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
