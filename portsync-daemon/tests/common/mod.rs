//! Recording stand-in for the qBittorrent session client.

#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use portsync_client::PortService;
use portsync_core::{PortValue, Preferences, SessionState};

#[derive(Debug, Default)]
pub struct FakeState {
    // behaviour
    pub login_ok: bool,
    pub set_port_ok: bool,
    /// Upcoming `preferences` calls that fail even with a session.
    pub preference_failures: usize,
    /// What the service reports as `listen_port`.
    pub listen_port: Option<i64>,

    // observations
    pub session: SessionState,
    pub logins: usize,
    pub resets: usize,
    pub preference_reads: usize,
    pub set_port_calls: Vec<u16>,
}

pub struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                login_ok: true,
                set_port_ok: true,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_listen_port(self, port: i64) -> Self {
        self.state().listen_port = Some(port);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }

    pub fn set_port_calls(&self) -> Vec<u16> {
        self.state().set_port_calls.clone()
    }

    /// Poll `check` until it holds or `timeout` passes.
    pub fn wait_for(&self, timeout: Duration, check: impl Fn(&FakeState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if check(&self.state()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        check(&self.state())
    }
}

impl PortService for FakeService {
    fn login(&self) -> bool {
        let mut state = self.state();
        state.logins += 1;
        state.session = if state.login_ok {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        state.login_ok
    }

    fn preferences(&self) -> Option<Preferences> {
        if !self.session_state().is_authenticated() && !self.login() {
            return None;
        }
        let mut state = self.state();
        state.preference_reads += 1;
        if state.preference_failures > 0 {
            state.preference_failures -= 1;
            return None;
        }
        Some(Preferences {
            listen_port: state.listen_port,
            ..Preferences::default()
        })
    }

    fn set_port(&self, port: PortValue) -> bool {
        if !self.session_state().is_authenticated() && !self.login() {
            return false;
        }
        let mut state = self.state();
        state.set_port_calls.push(port.get());
        if state.set_port_ok {
            state.listen_port = Some(i64::from(port.get()));
        }
        state.set_port_ok
    }

    fn reset_session(&self) {
        let mut state = self.state();
        state.resets += 1;
        state.session = SessionState::Unauthenticated;
    }

    fn session_state(&self) -> SessionState {
        self.state().session
    }
}

pub fn port(value: u16) -> PortValue {
    PortValue::new(value).expect("port")
}
