//! portsync daemon: port-file watcher, reconciler and supervisor loop.

mod error;
pub mod health;
pub mod logging;
pub mod reconciler;
mod runtime;
pub mod watcher;

pub use error::DaemonError;
pub use health::{probe, HealthOutcome};
pub use logging::init_tracing;
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use runtime::{run, run_until, shutdown_signal, start_blocking, DaemonConfig};
pub use watcher::{PortFileChanged, PortWatcher};
