use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

use portsync_client::{ClientConfig, PortService, QbitClient};
use portsync_core::Settings;

use crate::error::{io_err, DaemonError};
use crate::health;
use crate::logging::init_tracing;
use crate::reconciler::Reconciler;
use crate::watcher::{PortFileChanged, PortWatcher, SIGNAL_QUEUE_DEPTH};

/// The subset of [`Settings`] the supervisor itself needs.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub port_file: PathBuf,
    pub check_interval: Duration,
    pub settle_delay: Duration,
}

impl From<&Settings> for DaemonConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            port_file: settings.port_file.clone(),
            check_interval: settings.check_interval,
            settle_delay: settings.settle_delay,
        }
    }
}

/// Start the daemon and block the current thread until it exits.
pub fn start_blocking(settings: &Settings) -> Result<(), DaemonError> {
    init_tracing(settings.log_level, settings.log_format);
    tracing::info!("starting portsync");
    tracing::info!(host = %settings.base_url(), "qBittorrent host");
    tracing::info!(path = %settings.port_file.display(), "port file");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    let service: Arc<dyn PortService> = Arc::new(QbitClient::new(ClientConfig::from(settings)));
    runtime.block_on(run(DaemonConfig::from(settings), service))
}

/// Run until ctrl-c or SIGTERM.
pub async fn run(config: DaemonConfig, service: Arc<dyn PortService>) -> Result<(), DaemonError> {
    run_until(config, service, shutdown_signal()).await
}

/// Run until `shutdown` resolves or a worker task exits.
///
/// Startup (initial login, watch setup) failures are returned; everything
/// after that is logged and retried on the next event or tick.
pub async fn run_until<F>(
    config: DaemonConfig,
    service: Arc<dyn PortService>,
    shutdown: F,
) -> Result<(), DaemonError>
where
    F: Future<Output = ()>,
{
    let login_service = service.clone();
    if !blocking("login", move || login_service.login()).await? {
        tracing::error!("failed to connect to qBittorrent; exiting");
        return Err(DaemonError::InitialLogin);
    }

    let mut reconciler = Reconciler::new(config.port_file.clone(), service.clone());
    if config.port_file.exists() {
        tracing::info!("performing initial port update");
        reconciler = blocking("startup reconcile", move || {
            reconciler.startup();
            reconciler
        })
        .await?;
    } else {
        tracing::warn!(
            path = %config.port_file.display(),
            "port file does not exist yet; waiting for it to be created",
        );
    }

    let (signal_tx, signal_rx) = mpsc::channel::<PortFileChanged>(SIGNAL_QUEUE_DEPTH);
    let watcher = PortWatcher::start(&config.port_file, signal_tx)?;
    tracing::info!("file watcher started; monitoring for port changes");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(4);

    let reconcile_handle = {
        let exit_tx = shutdown_tx.clone();
        let settle_delay = config.settle_delay;
        let stop_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            let result = reconcile_task(reconciler, signal_rx, settle_delay, stop_rx).await;
            let _ = exit_tx.send(());
            result
        })
    };

    let health_handle = {
        let exit_tx = shutdown_tx.clone();
        let service = service.clone();
        let interval = config.check_interval;
        let stop_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            let result = health_task(service, interval, stop_rx).await;
            let _ = exit_tx.send(());
            result
        })
    };

    tokio::select! {
        _ = shutdown => tracing::info!("received shutdown signal; shutting down"),
        _ = shutdown_rx.recv() => tracing::warn!("worker task exited; shutting down"),
    }

    drop(watcher);
    let _ = shutdown_tx.send(());

    let (reconcile_result, health_result) = tokio::join!(reconcile_handle, health_handle);
    handle_join("reconciler", reconcile_result)?;
    handle_join("health_check", health_result)?;

    tracing::info!("portsync stopped");
    Ok(())
}

/// Single consumer of watcher signals; all reconciliation runs here.
async fn reconcile_task(
    mut reconciler: Reconciler,
    mut signals: mpsc::Receiver<PortFileChanged>,
    settle_delay: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            signal = signals.recv() => {
                if signal.is_none() {
                    break;
                }

                // Let the writer finish before reading.
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = tokio::time::sleep(settle_delay) => {}
                }
                let coalesced = drain_pending(&mut signals);
                if coalesced > 0 {
                    tracing::debug!(coalesced, "coalesced port file events");
                }

                reconciler = blocking("reconcile", move || {
                    reconciler.reconcile();
                    reconciler
                })
                .await?;
            }
        }
    }
    Ok(())
}

/// Discard signals already queued; the upcoming read covers them.
pub(crate) fn drain_pending(signals: &mut mpsc::Receiver<PortFileChanged>) -> usize {
    let mut drained = 0;
    while signals.try_recv().is_ok() {
        drained += 1;
    }
    drained
}

async fn health_task(
    service: Arc<dyn PortService>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // first tick is immediate; startup already talked to the service

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = ticker.tick() => {
                let service = service.clone();
                blocking("health_check", move || health::probe(service.as_ref())).await?;
            }
        }
    }
    Ok(())
}

/// Resolve on ctrl-c or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

async fn blocking<T, F>(task: &'static str, f: F) -> Result<T, DaemonError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|source| DaemonError::Join { task, source })
}

fn handle_join(
    task: &'static str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(source) => Err(DaemonError::Join { task, source }),
    }
}
