use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Overrides the default directives, e.g. `HERITAGE_TRAIL_LOG=heritage_trail::adapters=trace`.
/// `RUST_LOG` is honoured when this is unset.
pub const LOG_ENV: &str = "HERITAGE_TRAIL_LOG";

/// HTTP client internals only matter when something goes wrong.
const QUIET_DEPENDENCIES: &str = "reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn";

pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,heritage_trail={},{}", level, QUIET_DEPENDENCIES)
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// One JSON object per event, for piping narration runs into log tooling.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(build_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_target(true),
        )
        .init();
}
