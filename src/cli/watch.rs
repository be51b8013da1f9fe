//! Watch command implementation

use crate::cli::WatchArgs;
use crate::config::{LogFormat, MonitorConfig, TargetConfig};
use crate::health::TargetMonitor;
use crate::metrics::{handler, setup_metrics, MetricsState};
use crate::notify::build_notifier;
use crate::status::StatusBoard;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &WatchArgs,
) -> Result<MonitorConfig, Box<dyn std::error::Error>> {
    // A missing file is fine when targets come from --url or the environment
    let mut config = if args.config.exists() {
        MonitorConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        MonitorConfig::default()
    };

    // --url replaces the file targets; env and flag overrides apply on top
    if let Some(ref url) = args.url {
        config.targets = vec![TargetConfig::for_url(url.clone())];
    }

    config = config.with_env_overrides();
    if let Some(interval) = args.interval {
        for target in &mut config.targets {
            target.interval_seconds = interval;
        }
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_metrics {
        config.server.enabled = false;
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

/// Start one monitor per target plus the exposure endpoint, and run until
/// `cancel_token` fires.
pub async fn run_monitors(
    config: MonitorConfig,
    cancel_token: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let notifier = build_notifier(&config.notify)?;
    tracing::info!(notifier = notifier.name(), "Alert delivery configured");

    let board = Arc::new(StatusBoard::new());

    // Build every monitor before spawning anything
    let monitors = config
        .targets
        .iter()
        .map(|target| {
            TargetMonitor::new(target.clone(), Arc::clone(&notifier))
                .map(|monitor| monitor.with_status_board(Arc::clone(&board)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let server_handle = if config.server.enabled {
        let prometheus_handle = setup_metrics()?;
        let addr = config.server.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let state = Arc::new(MetricsState::new(
            Arc::clone(&board),
            Instant::now(),
            prometheus_handle,
        ));
        Some(handler::start(listener, state, cancel_token.clone()))
    } else {
        tracing::info!("Metrics endpoint disabled");
        None
    };

    let monitor_handles: Vec<_> = monitors
        .into_iter()
        .map(|monitor| monitor.start(cancel_token.clone()))
        .collect();
    tracing::info!(targets = monitor_handles.len(), "Monitoring started");

    cancel_token.cancelled().await;

    for handle in monitor_handles {
        handle.await?;
    }
    if let Some(handle) = server_handle {
        tracing::info!("Waiting for metrics endpoint to stop");
        handle.await??;
    }

    tracing::info!("page-monitor stopped");
    Ok(())
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting page-monitor");
    tracing::debug!(?config, "Loaded configuration");

    let cancel_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel_token.clone()));

    run_monitors(config, cancel_token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthPolicy;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn watch_args(config: PathBuf) -> WatchArgs {
        WatchArgs {
            config,
            url: None,
            interval: None,
            port: None,
            log_level: None,
            no_metrics: false,
        }
    }

    #[test]
    fn test_watch_config_loading() {
        let _guard = crate::config::env_lock();
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[server]\nport = 9300\n\n[[targets]]\nurl = \"http://a.test\"\n\n[targets.policy]\nkind = \"consecutive_failures\"\n",
        )
        .unwrap();

        let config = load_config_with_overrides(&watch_args(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 9300);
        assert_eq!(
            config.targets[0].policy,
            HealthPolicy::ConsecutiveFailures { failure_threshold: 3 }
        );
    }

    #[test]
    fn test_watch_cli_overrides_config() {
        let _guard = crate::config::env_lock();
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[server]\nport = 9300\n\n[[targets]]\nurl = \"http://a.test\"\n\n[[targets]]\nurl = \"http://b.test\"\n",
        )
        .unwrap();

        let mut args = watch_args(temp.path().to_path_buf());
        args.port = Some(9400);
        args.interval = Some(1);
        args.no_metrics = true;

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 9400);
        assert!(!config.server.enabled);
        assert!(config.targets.iter().all(|t| t.interval_seconds == 1));
    }

    #[test]
    fn test_watch_url_replaces_targets() {
        let _guard = crate::config::env_lock();
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[[targets]]\nurl = \"http://a.test\"\n").unwrap();

        let mut args = watch_args(temp.path().to_path_buf());
        args.url = Some("http://only.test".to_string());

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].url, "http://only.test");
    }

    #[test]
    fn test_watch_env_interval_applies_to_url_target() {
        let _guard = crate::config::env_lock();
        std::env::set_var("PAGE_MONITOR_INTERVAL", "3");

        let mut args = watch_args(PathBuf::from("nonexistent.toml"));
        args.url = Some("http://localhost:8080".to_string());
        let from_env = load_config_with_overrides(&args).unwrap();

        args.interval = Some(7);
        let from_cli = load_config_with_overrides(&args).unwrap();

        std::env::remove_var("PAGE_MONITOR_INTERVAL");

        assert_eq!(from_env.targets.len(), 1);
        assert_eq!(from_env.targets[0].interval_seconds, 3);
        assert_eq!(from_cli.targets[0].interval_seconds, 7);
    }

    #[test]
    fn test_watch_works_without_config_file() {
        let _guard = crate::config::env_lock();
        let mut args = watch_args(PathBuf::from("nonexistent.toml"));
        args.url = Some("http://localhost:8080".to_string());

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 2112);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_run_monitors_stops_on_cancel() {
        let mut config = MonitorConfig::default();
        config.server.enabled = false;
        config.targets.push(TargetConfig {
            url: "http://127.0.0.1:1/".to_string(),
            interval_seconds: 1,
            timeout_seconds: 1,
            ..TargetConfig::default()
        });

        let cancel = CancellationToken::new();
        let canceller = {
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancel.cancel();
            }
        };

        let (result, _) = tokio::time::timeout(Duration::from_secs(3), async {
            tokio::join!(run_monitors(config, cancel.clone()), canceller)
        })
        .await
        .expect("monitors did not stop after cancel");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_monitors_invalid_target_starts_nothing() {
        let mut config = MonitorConfig::default();
        config.server.enabled = false;
        config.targets.push(TargetConfig::for_url("http://127.0.0.1:1/"));
        config.targets.push(TargetConfig {
            interval_seconds: 0,
            ..TargetConfig::for_url("http://127.0.0.1:2/")
        });

        let cancel = CancellationToken::new();
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            run_monitors(config, cancel.clone()),
        )
        .await
        .expect("run_monitors should fail fast");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_signal_returns_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result =
            tokio::time::timeout(Duration::from_secs(1), shutdown_signal(cancel.clone())).await;
        assert!(result.is_ok());
    }
}
