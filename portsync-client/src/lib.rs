//! qBittorrent WebUI session client.
//!
//! [`QbitClient`] owns the authenticated session and is the only thing that
//! mutates [`SessionState`](portsync_core::SessionState). Callers depend on
//! the [`PortService`] trait so the reconciler can be driven by a fake.

mod error;
mod service;
mod session;

pub use error::ClientError;
pub use service::PortService;
pub use session::{
    ClientConfig, PortPatch, QbitClient, LOGIN_PATH, PREFERENCES_PATH, SET_PREFERENCES_PATH,
};
