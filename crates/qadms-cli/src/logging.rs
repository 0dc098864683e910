//! Tracing setup. Logs go to stderr so stdout stays machine-readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

pub const LOG_ENV: &str = "QADMS_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// `QADMS_LOG` wins, then the config's `log_filter`, then `warn`.
fn build_env_filter(config_filter: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    config_filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init(config_filter: Option<&str>) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config_filter))
        .with(fmt_layer)
        .try_init();
}
