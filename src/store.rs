//! Main CookieStore struct tying mirror, host and listeners together.

use crate::codec::{decode_value, Codec, ParseOptions, WireCodec};
use crate::error::Result;
use crate::host::{spawn_probe, AvailabilityFlag, HostStore};
use crate::types::{
    ChangeEvent, CookieAttributes, CookieValue, HostAvailability, Jar, ListenerId, ReadOptions,
    Snapshot,
};
use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tracing::{debug, warn};

/// Callback invoked synchronously for every change.
pub type Listener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Cookies the mirror starts with.
#[derive(Clone, Debug, Default)]
pub enum InitialCookies {
    #[default]
    Empty,
    /// Raw cookie text, parsed with the store's codec.
    Header(String),
    /// Already parsed name/value pairs, used as-is.
    Map(BTreeMap<String, String>),
}

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Initial contents of the mirror.
    pub initial: InitialCookies,

    /// Options used whenever raw cookie text is parsed.
    pub parse: ParseOptions,

    /// Name of the background thread running the host probe.
    pub probe_thread_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial: InitialCookies::Empty,
            parse: ParseOptions::default(),
            probe_thread_name: "cookie-host-probe".to_string(),
        }
    }
}

impl StoreConfig {
    /// Start from a raw cookie header.
    pub fn from_header(raw: impl Into<String>) -> Self {
        Self {
            initial: InitialCookies::Header(raw.into()),
            ..Default::default()
        }
    }
}

/// Point in the past used to expire cookies on erase.
fn deletion_expiry() -> DateTime<Utc> {
    DateTime::<Utc>::from(UNIX_EPOCH + Duration::from_secs(1))
}

/// The cookie store.
///
/// Keeps an in-memory mirror of the cookies, reconciled with the host store
/// on every read when a host is available, and notifies listeners of every
/// write and erase.
///
/// - Mirror updates are copy-on-write: a [`Jar`] handed out is never mutated.
/// - Host availability is probed once, in the background, at construction.
///   Until it resolves (and forever, if it resolves negatively) the mirror is
///   authoritative.
/// - Operations never fail because of the host: host errors are logged and
///   dropped.
pub struct CookieStore {
    /// Current mirror.
    jar: RwLock<Jar>,

    /// Registered listeners, in registration order.
    listeners: Mutex<Vec<(ListenerId, Listener)>>,

    /// Counter for generating listener IDs.
    next_listener: AtomicU64,

    /// Host store, if one was supplied.
    host: Option<Arc<dyn HostStore>>,

    /// Wire codec.
    codec: Arc<dyn Codec>,

    /// Parse options for host reads.
    parse: ParseOptions,

    /// Host availability, written once by the probe.
    availability: Arc<AvailabilityFlag>,

    /// Signalled when the probe resolves.
    probe: Option<Receiver<HostAvailability>>,
}

impl CookieStore {
    /// Create a mirror-only store. No host is ever consulted.
    pub fn new(config: StoreConfig) -> Self {
        Self::build(config, None, Arc::new(WireCodec))
    }

    /// Create a store backed by `host`, using the default wire codec.
    ///
    /// The host probe runs in the background; this never blocks.
    pub fn with_host(config: StoreConfig, host: Arc<dyn HostStore>) -> Self {
        Self::build(config, Some(host), Arc::new(WireCodec))
    }

    /// Create a store backed by `host` with a custom codec.
    pub fn with_host_and_codec(
        config: StoreConfig,
        host: Arc<dyn HostStore>,
        codec: Arc<dyn Codec>,
    ) -> Self {
        Self::build(config, Some(host), codec)
    }

    fn build(
        config: StoreConfig,
        host: Option<Arc<dyn HostStore>>,
        codec: Arc<dyn Codec>,
    ) -> Self {
        let initial = match config.initial {
            InitialCookies::Empty => BTreeMap::new(),
            InitialCookies::Header(ref raw) => codec.parse(raw, &config.parse),
            InitialCookies::Map(ref map) => map.clone(),
        };

        let (availability, probe) = match host {
            Some(ref host) => {
                let flag = Arc::new(AvailabilityFlag::new(HostAvailability::Unknown));
                let rx = spawn_probe(
                    Arc::clone(host),
                    Arc::clone(&flag),
                    &config.probe_thread_name,
                );
                (flag, Some(rx))
            }
            None => (
                Arc::new(AvailabilityFlag::new(HostAvailability::Unavailable)),
                None,
            ),
        };

        Self {
            jar: RwLock::new(Arc::new(initial)),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            host,
            codec,
            parse: config.parse,
            availability,
            probe,
        }
    }

    // --- Host Availability ---

    /// Current host availability.
    pub fn availability(&self) -> HostAvailability {
        self.availability.get()
    }

    /// Wait up to `timeout` for the host probe to resolve.
    ///
    /// Returns the availability at the time the wait ends. Store operations
    /// never call this; it exists for callers that want a deterministic
    /// starting point.
    pub fn await_probe(&self, timeout: Duration) -> HostAvailability {
        if self.availability.get() != HostAvailability::Unknown {
            return self.availability.get();
        }
        if let Some(ref rx) = self.probe {
            if let Ok(resolved) = rx.recv_timeout(timeout) {
                return resolved;
            }
        }
        self.availability.get()
    }

    /// The host, only if the probe found it usable.
    fn live_host(&self) -> Option<&Arc<dyn HostStore>> {
        if self.availability.get().is_available() {
            self.host.as_ref()
        } else {
            None
        }
    }

    /// Replace the mirror with the host's current contents.
    fn refresh(&self) {
        let Some(host) = self.live_host() else {
            return;
        };

        match host.read_raw() {
            Ok(raw) => {
                let parsed = self.codec.parse(&raw, &self.parse);
                debug!(count = parsed.len(), "refreshed cookie mirror from host");
                *self.jar.write() = Arc::new(parsed);
            }
            Err(e) => {
                warn!(error = %e, "host cookie read failed, serving mirror");
            }
        }
    }

    // --- Read Operations ---

    /// Read one cookie.
    pub fn read(&self, name: &str, options: ReadOptions) -> Option<Value> {
        self.refresh();
        let jar = self.jar.read();
        jar.get(name).map(|raw| decode_value(raw, options.decode))
    }

    /// Read every cookie into a freshly built snapshot.
    pub fn read_all(&self, options: ReadOptions) -> Snapshot {
        self.refresh();
        let jar = self.jar.read().clone();
        jar.iter()
            .map(|(name, raw)| (name.clone(), decode_value(raw, options.decode)))
            .collect()
    }

    /// The raw mirror, after the same host refresh as `read_all`.
    pub fn jar(&self) -> Jar {
        self.refresh();
        self.jar.read().clone()
    }

    // --- Write Operations ---

    /// Set a cookie.
    ///
    /// Structured values are stored as JSON text. The mirror is always
    /// updated and listeners are always notified, whatever happens on the
    /// host side.
    pub fn write(&self, name: &str, value: impl Into<CookieValue>, attributes: CookieAttributes) {
        let encoded = value.into().encode();

        self.replace_jar(|jar| {
            jar.insert(name.to_string(), encoded.clone());
        });

        self.write_host(name, &encoded, &attributes);

        self.emit(ChangeEvent {
            name: name.to_string(),
            value: Some(encoded),
            attributes,
        });
    }

    /// Set a cookie to the JSON serialization of `value`.
    ///
    /// Fails, before anything is written, only if `value` cannot be serialized.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
        attributes: CookieAttributes,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.write(name, CookieValue::Json(value), attributes);
        Ok(())
    }

    /// Remove a cookie.
    ///
    /// `expires` and `max_age` are forced into the past; `domain`, `path` and
    /// the remaining attributes are kept so the deletion targets the scope
    /// the cookie was set with.
    pub fn erase(&self, name: &str, attributes: CookieAttributes) {
        let attributes = CookieAttributes {
            expires: Some(deletion_expiry()),
            max_age: Some(0),
            ..attributes
        };

        self.replace_jar(|jar| {
            jar.remove(name);
        });

        self.write_host(name, "", &attributes);

        self.emit(ChangeEvent {
            name: name.to_string(),
            value: None,
            attributes,
        });
    }

    /// Build a new jar from the current one and swap it in.
    fn replace_jar<F>(&self, mutate: F)
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut guard = self.jar.write();
        let mut next = (**guard).clone();
        mutate(&mut next);
        *guard = Arc::new(next);
    }

    /// Best-effort host write. Failures are logged, never returned.
    fn write_host(&self, name: &str, value: &str, attributes: &CookieAttributes) {
        let Some(host) = self.live_host() else {
            return;
        };

        let written = self
            .codec
            .serialize(name, value, attributes)
            .and_then(|line| host.write_raw(&line));

        if let Err(e) = written {
            warn!(cookie = name, error = %e, "host cookie write dropped");
        }
    }

    // --- Listeners ---

    /// Register a change listener. Listeners run in registration order.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners.lock().push((id, Arc::new(listener)));
        debug!(%id, "cookie listener registered");
        id
    }

    /// Remove a listener. Unknown IDs are ignored.
    ///
    /// Returns whether a listener was removed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        match listeners.iter().position(|(lid, _)| *lid == id) {
            Some(idx) => {
                listeners.remove(idx);
                debug!(%id, "cookie listener removed");
                true
            }
            None => false,
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver an event to a copy of the listener list.
    ///
    /// No lock is held while listeners run, so they may read, write or
    /// (un)subscribe freely.
    fn emit(&self, event: ChangeEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for CookieStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieStore")
            .field("availability", &self.availability())
            .field("cookies", &self.jar.read().len())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
