//! Logging and metrics initialisation.

use std::sync::{Once, OnceLock};

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Selections handled, labelled by `outcome`.
pub const SELECTIONS_TOTAL: &str = "laz_selections_total";

/// Wall time of a selection submission in seconds, labelled by `outcome`.
pub const SELECTION_DURATION: &str = "laz_selection_duration_seconds";

static LOGGING: Once = Once::new();
static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log shippers.
    Json,
}

/// Installs the global `tracing` subscriber.
///
/// Levels come from `RUST_LOG` and default to `info`. Later calls are no-ops.
pub fn init_logging(format: LogFormat) {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);
        match format {
            LogFormat::Pretty => registry.with(fmt::layer()).init(),
            LogFormat::Json => registry.with(fmt::layer().json()).init(),
        }
    });
}

/// Installs the Prometheus recorder and returns its render handle.
///
/// Later calls return the handle installed by the first one.
///
/// # Errors
///
/// Returns an error if another global metrics recorder is already installed.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    if let Some(handle) = PROMETHEUS.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install prometheus recorder: {e}"))?;

    describe_counter!(SELECTIONS_TOTAL, "Selections handled, by outcome");
    describe_histogram!(
        SELECTION_DURATION,
        "Time from receiving a selection to its admission decision or job handle"
    );

    tracing::info!("prometheus metrics recorder installed");
    Ok(PROMETHEUS.get_or_init(|| handle).clone())
}
