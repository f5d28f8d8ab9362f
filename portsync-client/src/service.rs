use portsync_core::{PortValue, Preferences, SessionState};

/// The managed service as seen by the reconciler and the supervisor.
///
/// Every method is blocking and bounded by the client's request timeout.
/// None of them return errors: failures are logged where they happen and
/// surface as `false` / `None`.
pub trait PortService: Send + Sync {
    /// Authenticate, replacing any existing session.
    fn login(&self) -> bool;

    /// Read the current preferences, logging in first if needed.
    /// `None` means the service could not be read, not "no preferences".
    fn preferences(&self) -> Option<Preferences>;

    /// Pin the listening port, disabling UPnP and random port selection.
    fn set_port(&self, port: PortValue) -> bool;

    /// Forget the current session so the next call logs in again.
    fn reset_session(&self);

    fn session_state(&self) -> SessionState;
}
