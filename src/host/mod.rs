//! Host cookie store access and availability probing.
//!
//! The host is whatever owns the persistent cookies (a browser's
//! `document.cookie`, a platform cookie manager, ...). It exposes exactly
//! two data operations: read the whole store as raw text, and write one
//! record as a wire line. There is no multi-record transaction.
//!
//! Whether a host is usable is decided once, in the background, by
//! [`spawn_probe`]. Until the probe resolves the store runs mirror-only.

mod memory;

pub use memory::MemoryHost;

use crate::error::Result;
use crate::types::HostAvailability;
use crossbeam_channel::{bounded, Receiver};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// A host-managed cookie store.
pub trait HostStore: Send + Sync {
    /// Detect whether the host store is usable.
    fn probe(&self) -> Result<bool>;

    /// Read the entire store as raw cookie text (`a=1; b=2`).
    fn read_raw(&self) -> Result<String>;

    /// Write one serialized record.
    fn write_raw(&self, line: &str) -> Result<()>;
}

/// Shared tri-state availability flag.
///
/// Written at most once by the probe, read by every store operation.
#[derive(Debug)]
pub(crate) struct AvailabilityFlag(AtomicU8);

impl AvailabilityFlag {
    pub(crate) fn new(initial: HostAvailability) -> Self {
        Self(AtomicU8::new(initial.to_u8()))
    }

    pub(crate) fn get(&self) -> HostAvailability {
        HostAvailability::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Resolve an `Unknown` flag. A resolved flag never changes again.
    pub(crate) fn resolve(&self, value: HostAvailability) -> bool {
        self.0
            .compare_exchange(
                HostAvailability::Unknown.to_u8(),
                value.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Run the host probe on a detached thread.
///
/// Any probe error or panic resolves the flag to `Unavailable`. The returned
/// receiver yields the resolved value once; it disconnects without a value
/// if the thread could not be spawned.
pub(crate) fn spawn_probe(
    host: Arc<dyn HostStore>,
    flag: Arc<AvailabilityFlag>,
    thread_name: &str,
) -> Receiver<HostAvailability> {
    let (tx, rx) = bounded(1);

    let spawned = thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || {
            let resolved = match catch_unwind(AssertUnwindSafe(|| host.probe())) {
                Ok(Ok(true)) => HostAvailability::Available,
                Ok(Ok(false)) => HostAvailability::Unavailable,
                Ok(Err(e)) => {
                    debug!(error = %e, "host cookie probe failed");
                    HostAvailability::Unavailable
                }
                Err(_) => {
                    debug!("host cookie probe panicked");
                    HostAvailability::Unavailable
                }
            };

            flag.resolve(resolved);
            debug!(availability = ?resolved, "host cookie probe resolved");
            let _ = tx.send(flag.get());
        });

    if let Err(e) = spawned {
        warn!(error = %e, "failed to spawn host cookie probe, staying mirror-only");
    }

    rx
}
