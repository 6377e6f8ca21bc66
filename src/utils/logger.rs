use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "person_batch=info";
const VERBOSE_FILTER: &str = "person_batch=debug,info";

// RUST_LOG 優先於預設值
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// CLI 與 JSON 輸出共用的 fmt layer 設定
fn fmt_layer<S>() -> fmt::Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

pub fn init_cli_logger(verbose: bool) {
    let filter = env_filter(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer().compact())
        .init();
}

/// JSON 格式日誌，適合交給日誌收集系統
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(fmt_layer().json())
        .init();
}
