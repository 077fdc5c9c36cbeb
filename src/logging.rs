/// Structured logging setup using tracing
///
/// Writes to stderr so request/response bodies on stdout-piped tooling stay
/// clean. Human-readable with ANSI colors when stderr is a terminal,
/// structured JSON when piped/redirected (e.g. under a process supervisor).

use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Initialize the global tracing subscriber.
///
/// Level comes from config.log_level; RUST_LOG overrides it at runtime.
pub fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let base = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if std::io::stderr().is_terminal() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(base.with_ansi(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(base.json())
            .init();
    }
}
