/// Options for tracing initialization, read from the process environment.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Filter directives applied when `RUST_LOG` is unset.
    pub default_directives: String,
}

impl TracingConfig {
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_directives: "info,lydskrift=debug,tower_http=debug".to_string(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
