//! Core types for the cookie store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of the raw mirror: cookie name to encoded value.
///
/// Every mutation of the store builds a new map and swaps the `Arc`, so a
/// `Jar` obtained earlier keeps showing the values it was taken with.
pub type Jar = Arc<BTreeMap<String, String>>;

/// Decoded view of the store, as returned by `read_all`.
pub type Snapshot = BTreeMap<String, Value>;

/// A value handed to `write`.
#[derive(Clone, Debug, PartialEq)]
pub enum CookieValue {
    /// Stored verbatim.
    Text(String),
    /// Stored as JSON text, unless it is a JSON string (stored verbatim).
    Json(Value),
}

impl CookieValue {
    /// Encode into the raw string kept in the jar.
    pub fn encode(self) -> String {
        match self {
            CookieValue::Text(s) => s,
            CookieValue::Json(Value::String(s)) => s,
            CookieValue::Json(other) => other.to_string(),
        }
    }
}

impl From<&str> for CookieValue {
    fn from(s: &str) -> Self {
        CookieValue::Text(s.to_string())
    }
}

impl From<String> for CookieValue {
    fn from(s: String) -> Self {
        CookieValue::Text(s)
    }
}

impl From<Value> for CookieValue {
    fn from(v: Value) -> Self {
        CookieValue::Json(v)
    }
}

/// `SameSite` cookie attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Attributes passed through to the host on write.
///
/// The mirror itself never interprets these: expiry and scoping are the
/// host's business.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CookieAttributes {
    pub expires: Option<DateTime<Utc>>,
    /// Lifetime in seconds.
    pub max_age: Option<i64>,
    pub domain: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl CookieAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }
}

/// Notification emitted once per `write` or `erase`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub name: String,
    /// Encoded value written, or `None` for an erase.
    pub value: Option<String>,
    /// Attributes used for the host write. For an erase these are the
    /// deletion attributes.
    pub attributes: CookieAttributes,
}

impl ChangeEvent {
    pub fn is_erase(&self) -> bool {
        self.value.is_none()
    }
}

/// Identifier returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// How values are decoded on read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Return the raw string.
    #[default]
    Raw,
    /// Parse as JSON, falling back to the raw string.
    Json,
    /// Parse as JSON only when the value looks serialized
    /// (starts with `{`, `[` or `"`).
    Guess,
}

/// Options for `read` and `read_all`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub decode: DecodePolicy,
}

impl ReadOptions {
    pub fn raw() -> Self {
        Self {
            decode: DecodePolicy::Raw,
        }
    }

    pub fn json() -> Self {
        Self {
            decode: DecodePolicy::Json,
        }
    }

    pub fn guess() -> Self {
        Self {
            decode: DecodePolicy::Guess,
        }
    }
}

/// Whether a usable host cookie store was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostAvailability {
    /// Probe has not resolved yet. Treated as unavailable.
    Unknown,
    Available,
    Unavailable,
}

impl HostAvailability {
    pub fn is_available(self) -> bool {
        matches!(self, HostAvailability::Available)
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            HostAvailability::Unknown => 0,
            HostAvailability::Available => 1,
            HostAvailability::Unavailable => 2,
        }
    }

    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => HostAvailability::Available,
            2 => HostAvailability::Unavailable,
            _ => HostAvailability::Unknown,
        }
    }
}
