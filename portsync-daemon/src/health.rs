//! Liveness probe run on every supervisor tick.

use portsync_client::PortService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Preferences were readable.
    Healthy { listen_port: Option<i64> },
    /// Preferences were unreadable; a fresh login succeeded.
    Reconnected,
    /// Preferences were unreadable and the fresh login failed too.
    Unreachable,
}

/// Read preferences; on failure drop the session and log in again.
///
/// Never gives up: an unreachable service is simply probed again next tick.
pub fn probe(service: &dyn PortService) -> HealthOutcome {
    if let Some(prefs) = service.preferences() {
        match prefs.listen_port {
            Some(port) => tracing::debug!(port, "current qBittorrent listening port"),
            None => tracing::debug!("current qBittorrent listening port: unknown"),
        }
        return HealthOutcome::Healthy {
            listen_port: prefs.listen_port,
        };
    }

    tracing::warn!("lost connection to qBittorrent, attempting to reconnect");
    service.reset_session();
    if service.login() {
        tracing::info!("reconnected to qBittorrent");
        HealthOutcome::Reconnected
    } else {
        tracing::error!("failed to reconnect to qBittorrent");
        HealthOutcome::Unreachable
    }
}
