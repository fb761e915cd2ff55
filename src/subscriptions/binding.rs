//! Consumer bindings: a snapshot kept current by the selective update protocol.

use super::protocol::SelectiveUpdate;
use super::types::{BindingConfig, Surface};
use crate::store::CookieStore;
use crate::types::{CookieAttributes, CookieValue, ListenerId, Snapshot};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// State shared between a binding and its store listener.
struct BindingState {
    /// Last snapshot delivered to the consumer.
    current: Arc<Snapshot>,
    protocol: SelectiveUpdate,
}

/// One consumer's view of a [`CookieStore`].
///
/// While active, every change event makes the binding re-read the store and,
/// if one of its dependencies changed, replace its snapshot and queue the
/// new snapshot on its update channel. The queue holds at most
/// `buffer_size` snapshots; an undrained queue drops its oldest entry.
/// Dropping the binding (or calling [`close`](Self::close)) unregisters it.
pub struct CookieBinding {
    store: Arc<CookieStore>,
    listener: Option<ListenerId>,
    state: Arc<Mutex<BindingState>>,
    receiver: Receiver<Arc<Snapshot>>,
}

impl CookieBinding {
    /// Start observing `store`.
    ///
    /// The current contents become both the initial snapshot and the
    /// baseline. On a [`Surface::Static`] no listener is registered and the
    /// snapshot never changes.
    pub fn observe(store: &Arc<CookieStore>, config: BindingConfig) -> Self {
        let initial = store.read_all(config.read);
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        let state = Arc::new(Mutex::new(BindingState {
            current: Arc::new(initial.clone()),
            protocol: SelectiveUpdate::new(config.dependencies, initial),
        }));

        let listener = match config.surface {
            Surface::Static => None,
            Surface::Interactive => {
                let weak = Arc::downgrade(store);
                let shared = Arc::clone(&state);
                let read = config.read;
                let overflow = receiver.clone();

                Some(store.subscribe(move |_event| {
                    let Some(store) = weak.upgrade() else {
                        return;
                    };
                    let next = store.read_all(read);

                    let mut state = shared.lock();
                    if let Some(delivered) = state.protocol.evaluate(next) {
                        let delivered = Arc::new(delivered);
                        state.current = Arc::clone(&delivered);
                        // Never block: this runs inside the store's write.
                        if let Err(TrySendError::Full(delivered)) = sender.try_send(delivered) {
                            let _ = overflow.try_recv();
                            let _ = sender.try_send(delivered);
                            trace!("binding queue full, dropped oldest snapshot");
                        }
                    }
                }))
            }
        };

        if let Some(id) = listener {
            debug!(%id, "cookie binding active");
        }

        Self {
            store: Arc::clone(store),
            listener,
            state,
            receiver,
        }
    }

    /// The last delivered snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state.lock().current)
    }

    /// Whether the binding is observing the store.
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Dependencies this binding was created with.
    pub fn dependencies(&self) -> Option<Vec<String>> {
        self.state.lock().protocol.dependencies().map(<[String]>::to_vec)
    }

    /// Write handle bound to the same store.
    pub fn setter(&self) -> CookieSetter {
        CookieSetter {
            store: Arc::clone(&self.store),
        }
    }

    /// Erase handle bound to the same store.
    pub fn remover(&self) -> CookieRemover {
        CookieRemover {
            store: Arc::clone(&self.store),
        }
    }

    /// Current snapshot plus write and erase handles.
    pub fn parts(&self) -> (Arc<Snapshot>, CookieSetter, CookieRemover) {
        (self.snapshot(), self.setter(), self.remover())
    }

    /// Next delivered snapshot, if one is queued.
    pub fn try_recv(&self) -> Result<Arc<Snapshot>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Wait for the next delivered snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Arc<Snapshot>, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Stop observing. Idempotent.
    pub fn close(&mut self) {
        if let Some(id) = self.listener.take() {
            self.store.unsubscribe(id);
            debug!(%id, "cookie binding closed");
        }
    }
}

impl Drop for CookieBinding {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sets cookies on the store a binding observes.
#[derive(Clone)]
pub struct CookieSetter {
    store: Arc<CookieStore>,
}

impl CookieSetter {
    pub fn set(&self, name: &str, value: impl Into<CookieValue>, attributes: CookieAttributes) {
        self.store.write(name, value, attributes);
    }
}

/// Erases cookies on the store a binding observes.
#[derive(Clone)]
pub struct CookieRemover {
    store: Arc<CookieStore>,
}

impl CookieRemover {
    pub fn remove(&self, name: &str, attributes: CookieAttributes) {
        self.store.erase(name, attributes);
    }
}
