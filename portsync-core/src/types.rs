//! Domain types shared by the client and the daemon.

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PortParseError;

// ---------------------------------------------------------------------------
// PortValue
// ---------------------------------------------------------------------------

/// A listening port in the range 1–65535.
///
/// Zero is unrepresentable, so "no port" is always spelled `Option<PortValue>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortValue(NonZeroU16);

impl PortValue {
    /// Returns `None` for port 0.
    pub fn new(port: u16) -> Option<Self> {
        NonZeroU16::new(port).map(Self)
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<PortValue> for u16 {
    fn from(port: PortValue) -> Self {
        port.get()
    }
}

impl TryFrom<i64> for PortValue {
    type Error = PortParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(PortParseError::OutOfRange(value))
    }
}

/// Parses port-file text: surrounding whitespace is ignored, the rest must be
/// a base-10 integer in range.
impl FromStr for PortValue {
    type Err = PortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PortParseError::Empty);
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| PortParseError::NotANumber(trimmed.to_string()))?;
        Self::try_from(value)
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Login state of the WebUI session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Application preferences as reported by the service.
///
/// Only `listen_port` is interpreted; every other key is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<i64>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Preferences {
    /// The reported listening port, if it is a valid [`PortValue`].
    pub fn listening_port(&self) -> Option<PortValue> {
        self.listen_port
            .and_then(|port| PortValue::try_from(port).ok())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.other.get(key)
    }
}
