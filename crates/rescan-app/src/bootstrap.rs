//! Service wiring: configuration, logging, triggers and the API listener.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use rescan_api::{ApiServer, HttpTrigger, TdarrTrigger, TriggerDeps};
use rescan_config::{
    AppConfig, LogFormatSetting, LoggingSettings, TriggersConfig, config_path_from_env,
    load_from_path,
};
use rescan_core::{ScanProcessor, ScanQueue, ScanReceiver};
use rescan_telemetry::{LogFormat, LoggingConfig, Metrics};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Dependencies required to bootstrap the rescan service.
pub(crate) struct BootstrapDependencies {
    config: AppConfig,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Load configuration from the first argument, `RESCAN_CONFIG`, or
    /// `config.yml`, in that order.
    pub(crate) fn from_env() -> AppResult<Self> {
        let path = std::env::args_os()
            .nth(1)
            .map_or_else(config_path_from_env, PathBuf::from);
        let config = load_from_path(&path).map_err(|err| AppError::config("config.load", err))?;
        Self::new(config)
    }

    pub(crate) fn new(config: AppConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self { config, telemetry })
    }
}

/// Entry point for the rescan boot sequence.
///
/// # Errors
///
/// Returns an error if configuration loading, logging installation, trigger
/// construction or the API server fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    rescan_telemetry::init_logging(&logging_config(&dependencies.config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    run_app_with(dependencies, shutdown_signal()).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with<F>(dependencies: BootstrapDependencies, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies { config, telemetry } = dependencies;
    info!(triggers = config.triggers.tdarr.len(), "rescan bootstrap starting");

    let (queue, receiver) = ScanQueue::new();
    let consumer = spawn_scan_consumer(receiver);
    let processor: Arc<dyn ScanProcessor> = Arc::new(queue);

    let triggers = build_triggers(&config.triggers, &processor, &telemetry)?;
    drop(processor);
    if triggers.is_empty() {
        warn!("no triggers configured; only health and metrics will be served");
    }

    let api = ApiServer::new(triggers, telemetry)
        .map_err(|err| AppError::api_server("api_server.new", err))?;
    let addr = config.bind_addr();
    info!(addr = %addr, "launching api listener");
    let serve_result = api.serve(addr, shutdown).await;

    // Serving dropped the triggers, closing the queue.
    if let Err(err) = consumer.await {
        warn!(error = %err, "scan consumer join failed");
    }

    serve_result.map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("api server shutdown complete");
    Ok(())
}

/// Map configured logging settings onto the telemetry initialiser.
pub(crate) fn logging_config(settings: &LoggingSettings) -> LoggingConfig<'_> {
    let format = settings.format.map_or_else(LogFormat::infer, |format| match format {
        LogFormatSetting::Json => LogFormat::Json,
        LogFormatSetting::Pretty => LogFormat::Pretty,
    });
    LoggingConfig {
        level: &settings.level,
        format,
        ..LoggingConfig::default()
    }
}

/// Build one trigger per configured entry, all feeding `processor`.
pub(crate) fn build_triggers(
    config: &TriggersConfig,
    processor: &Arc<dyn ScanProcessor>,
    telemetry: &Metrics,
) -> AppResult<Vec<Arc<dyn HttpTrigger>>> {
    config
        .tdarr
        .iter()
        .map(|tdarr| {
            let deps = TriggerDeps::new(Arc::clone(processor)).with_metrics(telemetry.clone());
            let trigger = TdarrTrigger::new(tdarr, deps)
                .map_err(|err| AppError::trigger("tdarr.new", tdarr.name.clone(), err))?;
            debug!(name = %tdarr.name, rules = tdarr.rewrite.len(), "tdarr trigger ready");
            Ok(Arc::new(trigger) as Arc<dyn HttpTrigger>)
        })
        .collect()
}

fn spawn_scan_consumer(mut receiver: ScanReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(scan) = receiver.recv().await {
            info!(
                folder = %scan.folder,
                priority = scan.priority,
                analyze = scan.analyze,
                time = %scan.time,
                "scan received"
            );
        }
        debug!("scan queue closed");
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescan_config::TdarrConfig;
    use rescan_core::{RewriteRule, ScanRequest};
    use rescan_test_support::fixtures::fixed_instant;
    use rescan_test_support::logs::CapturedLogs;

    fn tdarr(name: &str, rules: Vec<RewriteRule>) -> TdarrConfig {
        TdarrConfig {
            name: name.to_string(),
            rewrite: rules,
            ..TdarrConfig::default()
        }
    }

    #[test]
    fn logging_config_maps_configured_format() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            format: Some(LogFormatSetting::Json),
        };
        let config = logging_config(&settings);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);

        let inferred = LoggingSettings {
            level: "info".to_string(),
            format: None,
        };
        assert_eq!(logging_config(&inferred).format, LogFormat::infer());
    }

    #[test]
    fn build_triggers_creates_one_per_entry() -> AppResult<()> {
        let telemetry = Metrics::new().map_err(|err| AppError::telemetry("metrics", err))?;
        let (queue, _receiver) = ScanQueue::new();
        let processor: Arc<dyn ScanProcessor> = Arc::new(queue);
        let config = TriggersConfig {
            tdarr: vec![tdarr("tdarr", Vec::new()), tdarr("tdarr-4k", Vec::new())],
        };

        let triggers = build_triggers(&config, &processor, &telemetry)?;
        let names: Vec<&str> = triggers.iter().map(|trigger| trigger.name()).collect();
        assert_eq!(names, vec!["tdarr", "tdarr-4k"]);
        assert!(triggers.iter().all(|trigger| trigger.kind() == "tdarr"));
        Ok(())
    }

    #[test]
    fn build_triggers_reports_invalid_rewrite() {
        let telemetry = Metrics::new().expect("metrics");
        let (queue, _receiver) = ScanQueue::new();
        let processor: Arc<dyn ScanProcessor> = Arc::new(queue);
        let config = TriggersConfig {
            tdarr: vec![tdarr("broken", vec![RewriteRule::new("[", "/x")])],
        };

        let Err(err) = build_triggers(&config, &processor, &telemetry) else {
            panic!("expected invalid rewrite to fail");
        };
        assert!(matches!(err, AppError::Trigger { ref name, .. } if name == "broken"));
    }

    #[tokio::test]
    async fn run_app_with_stops_on_shutdown() -> AppResult<()> {
        let mut config = AppConfig::default();
        config.host = "127.0.0.1".parse().expect("ip");
        config.port = 0;
        config.triggers.tdarr.push(tdarr("tdarr", Vec::new()));

        run_app_with(BootstrapDependencies::new(config)?, async {}).await
    }

    #[tokio::test]
    async fn run_app_with_rejects_duplicate_triggers() {
        let mut config = AppConfig::default();
        config.host = "127.0.0.1".parse().expect("ip");
        config.port = 0;
        config.triggers.tdarr.push(tdarr("tdarr", Vec::new()));
        config.triggers.tdarr.push(tdarr("tdarr", Vec::new()));

        let result = run_app_with(BootstrapDependencies::new(config).expect("deps"), async {}).await;
        assert!(matches!(result, Err(AppError::ApiServer { .. })));
    }

    #[tokio::test]
    async fn consumer_drains_queue_until_closed() {
        let (queue, receiver) = ScanQueue::new();
        let logs = CapturedLogs::new();
        let _guard = logs.install();
        let consumer = spawn_scan_consumer(receiver);

        queue
            .process(ScanRequest {
                folder: "/mnt/movies/Foo".to_string(),
                priority: 3,
                analyze: true,
                time: fixed_instant(),
            })
            .await
            .expect("queued");
        drop(queue);
        consumer.await.expect("consumer drains after queue closes");

        let received: Vec<String> = logs
            .lines()
            .into_iter()
            .filter(|line| line.contains("scan received"))
            .collect();
        assert_eq!(received.len(), 1);
        assert!(received[0].contains("/mnt/movies/Foo"));
        assert!(received[0].contains("priority=3"));
    }
}
