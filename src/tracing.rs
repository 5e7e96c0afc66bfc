use tracing::Level;
use tracing_subscriber::{
    EnvFilter, fmt::writer::MakeWriterExt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "balanced_swap=info,balanced=info";

pub fn init() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| format!("invalid log filter: {e}"))?;

    let stdout_log_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_target(true)
        .with_writer(std::io::stdout.with_max_level(Level::TRACE));

    tracing_subscriber::Registry::default()
        .with(filter)
        .with(stdout_log_layer)
        .try_init()
        .map_err(|e| format!("failed to install subscriber: {e}"))
}
