// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, ExecutorConfig, HttpConfig, LoggingConfig, PerformanceConfig, ResourcesConfig,
    ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "ScriptRunner/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 102_400)? // 100KB
            .set_default("resources.files_dir", "archivos")?
            .set_default("resources.public_dir", "public")?
            .set_default("resources.index_files", vec!["index.html", "index.htm"])?
            .set_default("executor.interpreter", "python")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        // PORT is the conventional deployment variable and wins over the
        // config file and the SERVER_* overrides.
        if let Ok(port) = std::env::var("PORT") {
            cfg.server.port = port.parse().map_err(|e| {
                config::ConfigError::Message(format!("invalid PORT value '{port}': {e}"))
            })?;
        }

        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_config_file() {
        let cfg = Config::load_from("no-such-config-file").expect("defaults should load");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.resources.files_dir, "archivos");
        assert_eq!(cfg.resources.public_dir, "public");
        assert_eq!(cfg.resources.index_files, vec!["index.html", "index.htm"]);
        assert_eq!(cfg.executor.interpreter, "python");
        assert_eq!(cfg.http.max_body_size, 102_400);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_socket_addr_parses() {
        let cfg = Config::load_from("no-such-config-file").expect("defaults should load");
        let addr = cfg.get_socket_addr().expect("default address is valid");
        assert!(addr.is_ipv4());
    }
}
