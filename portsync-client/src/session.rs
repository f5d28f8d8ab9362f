//! Cookie-backed WebUI session with login-on-demand.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use portsync_core::{PortValue, Preferences, SessionState, Settings};

use crate::error::ClientError;
use crate::service::PortService;

pub const LOGIN_PATH: &str = "/api/v2/auth/login";
pub const PREFERENCES_PATH: &str = "/api/v2/app/preferences";
pub const SET_PREFERENCES_PATH: &str = "/api/v2/app/setPreferences";

/// Body the WebUI returns for a successful login. Wrong credentials also get
/// HTTP 200, so the status alone is not enough.
const LOGIN_OK_BODY: &str = "Ok.";
/// Status the WebUI answers with once the session cookie is no longer valid.
const FORBIDDEN: u16 = 403;

/// Connection settings for [`QbitClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub auth_disabled: bool,
    pub timeout: Duration,
}

impl From<&Settings> for ClientConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.base_url().to_string(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            auth_disabled: settings.auth_disabled,
            timeout: settings.request_timeout,
        }
    }
}

/// The `setPreferences` patch sent for every port change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortPatch {
    pub listen_port: u16,
    pub upnp: bool,
    pub random_port: bool,
}

impl PortPatch {
    /// Fixed port, UPnP and random-port selection off: the VPN owns forwarding.
    pub fn pinned(port: PortValue) -> Self {
        Self {
            listen_port: port.get(),
            upnp: false,
            random_port: false,
        }
    }
}

pub struct QbitClient {
    agent: ureq::Agent,
    config: ClientConfig,
    // Held for the whole login round-trip so two callers never interleave a
    // login with a state read.
    state: Mutex<SessionState>,
}

impl QbitClient {
    pub fn new(mut config: ClientConfig) -> Self {
        config.host = config.host.trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            agent,
            config,
            state: Mutex::new(SessionState::Unauthenticated),
        }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host, path)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_login(&self) -> Result<(), ClientError> {
        let response = self.agent.post(&self.url(LOGIN_PATH)).send_form(&[
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ]);

        let (status, body) = match response {
            Ok(response) => {
                let status = response.status();
                (status, response.into_string().map_err(ClientError::Body)?)
            }
            Err(ureq::Error::Status(status, response)) => {
                (status, response.into_string().unwrap_or_default())
            }
            Err(err) => return Err(err.into()),
        };

        if status == 200 && body == LOGIN_OK_BODY {
            Ok(())
        } else {
            Err(ClientError::LoginRejected { status, body })
        }
    }

    /// Login with the state guard already held.
    fn login_locked(&self, state: &mut SessionState) -> bool {
        if self.config.auth_disabled {
            *state = SessionState::Authenticated;
            tracing::info!("WebUI authentication disabled; skipping login");
            return true;
        }

        *state = SessionState::Unauthenticated;
        match self.try_login() {
            Ok(()) => {
                *state = SessionState::Authenticated;
                tracing::info!(host = %self.config.host, "logged in to qBittorrent");
                true
            }
            Err(err) => {
                tracing::error!(host = %self.config.host, error = %err, "failed to log in to qBittorrent");
                false
            }
        }
    }

    /// Make sure a session exists, logging in if it does not.
    fn ensure_session(&self) -> bool {
        let mut state = self.lock_state();
        if state.is_authenticated() {
            return true;
        }
        self.login_locked(&mut state)
    }

    /// A 403 means the WebUI no longer accepts our cookie; log in again next time.
    fn drop_rejected_session(&self, err: &ClientError) {
        if matches!(err, ClientError::Status(FORBIDDEN)) {
            *self.lock_state() = SessionState::Unauthenticated;
            tracing::warn!("qBittorrent rejected the session; will log in again");
        }
    }

    fn fetch_preferences(&self) -> Result<Preferences, ClientError> {
        let response = self.agent.get(&self.url(PREFERENCES_PATH)).call()?;
        if response.status() != 200 {
            return Err(ClientError::Status(response.status()));
        }
        response.into_json().map_err(ClientError::Body)
    }

    fn push_port(&self, port: PortValue) -> Result<(), ClientError> {
        let patch = serde_json::to_string(&PortPatch::pinned(port))?;
        let response = self
            .agent
            .post(&self.url(SET_PREFERENCES_PATH))
            .send_form(&[("json", patch.as_str())])?;
        if response.status() != 200 {
            return Err(ClientError::Status(response.status()));
        }
        Ok(())
    }
}

impl PortService for QbitClient {
    fn login(&self) -> bool {
        let mut state = self.lock_state();
        self.login_locked(&mut state)
    }

    fn preferences(&self) -> Option<Preferences> {
        if !self.ensure_session() {
            return None;
        }
        match self.fetch_preferences() {
            Ok(preferences) => Some(preferences),
            Err(err) => {
                tracing::error!(error = %err, "failed to get qBittorrent preferences");
                self.drop_rejected_session(&err);
                None
            }
        }
    }

    fn set_port(&self, port: PortValue) -> bool {
        if !self.ensure_session() {
            return false;
        }
        match self.push_port(port) {
            Ok(()) => {
                tracing::info!(port = %port, "set qBittorrent listening port");
                true
            }
            Err(err) => {
                tracing::error!(port = %port, error = %err, "failed to set qBittorrent listening port");
                self.drop_rejected_session(&err);
                false
            }
        }
    }

    fn reset_session(&self) {
        *self.lock_state() = SessionState::Unauthenticated;
        tracing::debug!("qBittorrent session reset");
    }

    fn session_state(&self) -> SessionState {
        *self.lock_state()
    }
}
