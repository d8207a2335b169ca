//! Tracing subscriber setup shared by the binaries.

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter from `RUST_LOG`, else `drconnect=<level>` plus `default_directives`
pub fn env_filter(config: &LoggingConfig, default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = format!("drconnect={}", config.level);
        if !default_directives.is_empty() {
            directives.push(',');
            directives.push_str(default_directives);
        }
        EnvFilter::new(directives)
    })
}

/// Install the global subscriber
///
/// `format = "json"` emits one JSON object per event; anything else uses the
/// human-readable formatter.
pub fn init(config: &LoggingConfig, default_directives: &str) {
    let registry = tracing_subscriber::registry().with(env_filter(config, default_directives));

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
