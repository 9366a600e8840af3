use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives read before falling back to `RUST_LOG`.
pub const LOG_ENV: &str = "PLSS_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One short line per event, for people at a terminal.
    #[default]
    Compact,
    /// JSON lines, for batch runs whose logs are collected by another tool.
    Json,
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "plss_restore=debug,batch_restore=debug,info"
    } else {
        "plss_restore=info,batch_restore=info,warn"
    }
}

pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Logs go to stderr so restored coordinates and `--json` output on stdout
/// stay machine-readable.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = fmt::layer()
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}
