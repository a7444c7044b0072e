//! Command-line and environment configuration for `ahn-laz-server`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::estimate::{DensitySizeEstimator, EstimatorConfig, Extent};
use crate::network::{NetworkConfig, TlsConfig};
use crate::service::config::DEFAULT_EXECUTABLE_PATH;
use crate::service::SubmissionConfig;
use crate::submit::{HttpJobSubmitter, LocalProcessSubmitter, RecordingSubmitter};
use crate::telemetry::LogFormat;
use crate::traits::{JobSubmitter, SizeEstimator};

/// Where admitted jobs are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SubmitterKind {
    /// Run the slicer on this host.
    Local,
    /// POST jobs to `--submitter-url`.
    Http,
    /// Record jobs without running them.
    Memory,
}

/// Point-cloud selection server: estimates LAZ extractions and submits slicer jobs.
#[derive(Debug, Parser)]
#[command(name = "ahn-laz-server", version, about, long_about = None)]
pub struct Cli {
    /// Address to bind.
    #[arg(long, env = "AHN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (0 = OS-assigned).
    #[arg(long, env = "AHN_PORT", default_value_t = 8080)]
    pub port: u16,

    /// TLS certificate (PEM). Requires `--tls-key`.
    #[arg(long, env = "AHN_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    /// TLS private key (PEM). Requires `--tls-cert`.
    #[arg(long, env = "AHN_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// Allowed CORS origins, comma separated; `*` allows any.
    #[arg(long, env = "AHN_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Seconds a client may wait for a response.
    #[arg(long, env = "AHN_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Absolute path of the slicer executable.
    #[arg(long, env = "AHN_EXECUTABLE_PATH", default_value = DEFAULT_EXECUTABLE_PATH)]
    pub executable_path: String,

    /// Selections estimated above this many points are rejected.
    #[arg(long, env = "AHN_MAX_POINTS", default_value_t = 10_000_000)]
    pub max_allowed_points: u64,

    /// Submissions allowed in flight before new ones are shed.
    #[arg(long, env = "AHN_MAX_CONCURRENT_SUBMISSIONS", default_value_t = 64)]
    pub max_concurrent_submissions: u32,

    /// Job backend.
    #[arg(long, env = "AHN_SUBMITTER", value_enum, default_value_t = SubmitterKind::Local)]
    pub submitter: SubmitterKind,

    /// Job service endpoint for `--submitter http`.
    #[arg(long, env = "AHN_SUBMITTER_URL", required_if_eq("submitter", "http"))]
    pub submitter_url: Option<String>,

    /// Bounds of the indexed point cloud: `min_x,min_y,max_x,max_y`.
    #[arg(
        long,
        env = "AHN_DATASET_EXTENT",
        value_delimiter = ',',
        default_values_t = [13_427.0, 306_859.0, 278_000.0, 611_943.0]
    )]
    pub dataset_extent: Vec<f64>,

    /// Deepest octree level of the dataset.
    #[arg(long, env = "AHN_FINEST_LEVEL", default_value_t = 13)]
    pub finest_level: u32,

    /// Points per square unit at the finest level.
    #[arg(long, env = "AHN_POINT_DENSITY", default_value_t = 8.0)]
    pub point_density: f64,

    /// Log output format.
    #[arg(long, env = "AHN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Disable the Prometheus `/metrics` endpoint.
    #[arg(long, env = "AHN_NO_METRICS")]
    pub no_metrics: bool,
}

impl Cli {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }

    #[must_use]
    pub fn submission_config(&self) -> SubmissionConfig {
        SubmissionConfig {
            executable_path: self.executable_path.clone(),
            max_allowed_points: self.max_allowed_points,
            max_concurrent_submissions: self.max_concurrent_submissions,
        }
    }

    /// Density model config. The recommended level targets the admission ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error unless `dataset_extent` has exactly four values.
    pub fn estimator_config(&self) -> anyhow::Result<EstimatorConfig> {
        let [min_x, min_y, max_x, max_y] = self.dataset_extent[..] else {
            anyhow::bail!(
                "--dataset-extent needs 4 values, got {}",
                self.dataset_extent.len()
            );
        };
        Ok(EstimatorConfig {
            extent: Extent {
                min_x,
                min_y,
                max_x,
                max_y,
            },
            finest_level: self.finest_level,
            points_per_unit_area: self.point_density,
            target_points: self.max_allowed_points,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the estimator configuration is invalid.
    pub fn build_estimator(&self) -> anyhow::Result<Arc<dyn SizeEstimator>> {
        Ok(Arc::new(DensitySizeEstimator::new(self.estimator_config()?)))
    }

    /// # Errors
    ///
    /// Returns an error if `--submitter http` lacks a URL or its client fails to build.
    pub fn build_submitter(&self) -> anyhow::Result<Arc<dyn JobSubmitter>> {
        Ok(match self.submitter {
            SubmitterKind::Local => Arc::new(LocalProcessSubmitter::new()),
            SubmitterKind::Memory => Arc::new(RecordingSubmitter::new()),
            SubmitterKind::Http => {
                let Some(url) = &self.submitter_url else {
                    anyhow::bail!("--submitter-url is required with --submitter http");
                };
                let timeout = Duration::from_secs(self.request_timeout_secs);
                Arc::new(HttpJobSubmitter::new(url.clone(), timeout)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ahn-laz-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_typed_configs() {
        let cli = parse(&[]);

        let network = cli.network_config();
        assert_eq!(network.port, 8080);
        assert!(network.tls.is_none());
        assert_eq!(network.cors_origins, vec!["*"]);

        let submission = cli.submission_config();
        let defaults = SubmissionConfig::default();
        assert_eq!(submission.executable_path, defaults.executable_path);
        assert_eq!(submission.max_allowed_points, defaults.max_allowed_points);
        assert_eq!(
            submission.max_concurrent_submissions,
            defaults.max_concurrent_submissions
        );

        let estimator = cli.estimator_config().unwrap();
        assert_eq!(estimator.extent, EstimatorConfig::default().extent);
        assert_eq!(estimator.finest_level, 13);
        assert_eq!(cli.submitter, SubmitterKind::Local);
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn parses_overrides() {
        let cli = parse(&[
            "--port",
            "9000",
            "--executable-path",
            "/opt/slicer",
            "--max-allowed-points",
            "500",
            "--dataset-extent",
            "0,0,10,20",
            "--cors-origins",
            "https://a.nl,https://b.nl",
            "--submitter",
            "memory",
        ]);

        assert_eq!(cli.network_config().port, 9000);
        assert_eq!(cli.network_config().cors_origins, ["https://a.nl", "https://b.nl"]);
        assert_eq!(cli.submission_config().executable_path, "/opt/slicer");
        let estimator = cli.estimator_config().unwrap();
        assert_eq!(estimator.extent.max_y, 20.0);
        assert_eq!(estimator.target_points, 500);
        assert_eq!(cli.build_submitter().unwrap().backend_name(), "memory");
    }

    #[test]
    fn http_submitter_requires_url() {
        let result = Cli::try_parse_from(["ahn-laz-server", "--submitter", "http"]);
        assert!(result.is_err());

        let cli = parse(&["--submitter", "http", "--submitter-url", "http://jobs.local/submit"]);
        assert_eq!(cli.build_submitter().unwrap().backend_name(), "http");
    }

    #[test]
    fn tls_needs_both_files() {
        assert!(Cli::try_parse_from(["ahn-laz-server", "--tls-cert", "/c.pem"]).is_err());

        let cli = parse(&["--tls-cert", "/c.pem", "--tls-key", "/k.pem"]);
        let tls = cli.network_config().tls.unwrap();
        assert_eq!(tls.key_path, PathBuf::from("/k.pem"));
    }
}
