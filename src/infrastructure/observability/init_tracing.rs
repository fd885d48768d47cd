use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::TracingConfig;

/// Initialize the tracing subscriber. `RUST_LOG` wins over the config's
/// default directives; the output format follows `config.json_format`.
pub fn init_tracing(config: TracingConfig, port: u16) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.json_format {
        registry
            .with(fmt::layer().json().with_target(true).with_file(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_file(true))
            .init();
    }

    tracing::info!(
        port,
        environment = %config.environment,
        json = config.json_format,
        version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}
