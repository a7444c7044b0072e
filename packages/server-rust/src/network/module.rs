//! Network module with deferred startup lifecycle.
//!
//! `new()` creates shared resources, `start()` binds the TCP listener, and
//! `serve()` accepts connections until shutdown. The split lets the binary
//! report the bound port before traffic is accepted.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    health_handler, liveness_handler, metrics_handler, readiness_handler, size_handler,
    submit_laz_handler, AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `POST /laz` -- admit a selection and submit its slicer job
/// - `POST /size` -- estimate a selection
/// - `GET /health` -- detailed health JSON
/// - `GET /health/live` -- liveness probe
/// - `GET /health/ready` -- readiness probe
/// - `GET /metrics` -- Prometheus scrape endpoint
pub fn build_router(state: AppState, config: &NetworkConfig) -> Router {
    Router::new()
        .route("/laz", post(submit_laz_handler))
        .route("/size", post(size_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Manages the full HTTP server lifecycle.
///
/// 1. `new()` -- takes the application state and configuration
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- accepts connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    state: AppState,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            listener: None,
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the shutdown signal fires.
    ///
    /// After the signal, health moves to Draining and the server waits up to
    /// `drain_timeout` for in-flight selections before moving to Stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first, if TLS material
    /// cannot be loaded, or on a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener else {
            anyhow::bail!("start() must be called before serve()");
        };
        let shutdown_ctrl = Arc::clone(&self.state.shutdown);
        let router = build_router(self.state, &self.config);

        shutdown_ctrl.set_ready();

        if let Some(ref tls_config) = self.config.tls {
            serve_tls(listener, router, tls_config, Arc::clone(&shutdown_ctrl), shutdown).await?;
        } else {
            serve_plain(listener, router, Arc::clone(&shutdown_ctrl), shutdown).await?;
        }

        let drained = shutdown_ctrl.wait_for_drain(self.config.drain_timeout).await;
        if drained {
            info!("all in-flight selections finished");
        } else {
            warn!(
                in_flight = shutdown_ctrl.in_flight_count(),
                "drain timeout expired with selections still in flight"
            );
        }
        Ok(())
    }
}

/// Serves plain HTTP connections using axum's built-in server.
async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown_ctrl: Arc<ShutdownController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            shutdown_ctrl.trigger_shutdown();
        })
        .await?;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls.
///
/// Reuses the pre-bound TCP listener by converting it to a `std::net::TcpListener`.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: &TlsConfig,
    shutdown_ctrl: Arc<ShutdownController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls_config.cert_path, &tls_config.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_ctrl.trigger_shutdown();
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}
