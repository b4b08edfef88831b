use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人類可讀的精簡格式
    Compact,
    /// 一行一個 JSON 物件
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Filter used when `RUST_LOG` is unset. Verbose mode opens up the crate's
/// debug output (overlay builds, resyncs, taps) and leaves dependencies at info.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "venue_map=debug,info"
    } else {
        "venue_map=info,warn"
    }
}

/// Installs the global subscriber. Logs go to stderr so `--json` reports on
/// stdout stay machine-readable.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };

    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialised: {}", e);
    }
}
