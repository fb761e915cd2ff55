//! In-memory host cookie store.

use super::HostStore;
use crate::error::{CookieError, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProbeOutcome {
    Available,
    Unavailable,
    Fail,
    Panic,
}

/// Host store that behaves like a page's `document.cookie`.
///
/// Writes take one `Set-Cookie`-style line; a line whose `Max-Age` is zero or
/// negative, or whose `Expires` lies in the past, removes the cookie. Reads
/// return every live cookie as `name=value` pairs joined by `; `. Values are
/// kept in their wire (encoded) form.
#[derive(Debug)]
pub struct MemoryHost {
    probe: ProbeOutcome,
    entries: Mutex<BTreeMap<String, String>>,
    written: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryHost {
    fn with_probe(probe: ProbeOutcome) -> Self {
        Self {
            probe,
            entries: Mutex::new(BTreeMap::new()),
            written: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// A host whose probe reports it usable.
    pub fn available() -> Self {
        Self::with_probe(ProbeOutcome::Available)
    }

    /// A host whose probe reports it unusable (cookies disabled).
    pub fn unavailable() -> Self {
        Self::with_probe(ProbeOutcome::Unavailable)
    }

    /// A host whose probe returns an error.
    pub fn failing_probe() -> Self {
        Self::with_probe(ProbeOutcome::Fail)
    }

    /// A host whose probe panics.
    pub fn panicking_probe() -> Self {
        Self::with_probe(ProbeOutcome::Panic)
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Set a cookie directly on the host, bypassing any store.
    ///
    /// `value` is in wire form.
    pub fn seed(&self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().insert(name.into(), value.into());
    }

    /// Drop a cookie directly on the host, as if it expired.
    pub fn expire(&self, name: &str) {
        self.entries.lock().remove(name);
    }

    /// Raw lines received through `write_raw`, in order.
    pub fn written(&self) -> Vec<String> {
        self.written.lock().clone()
    }

    /// Current host value of a cookie, in wire form.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries.lock().get(name).cloned()
    }

    fn check_usable(&self) -> Result<()> {
        match self.probe {
            ProbeOutcome::Available => Ok(()),
            _ => Err(CookieError::HostUnavailable),
        }
    }
}

impl HostStore for MemoryHost {
    fn probe(&self) -> Result<bool> {
        match self.probe {
            ProbeOutcome::Available => Ok(true),
            ProbeOutcome::Unavailable => Ok(false),
            ProbeOutcome::Fail => Err(CookieError::Host("cookie API not present".into())),
            ProbeOutcome::Panic => panic!("cookie API exploded during probe"),
        }
    }

    fn read_raw(&self) -> Result<String> {
        self.check_usable()?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CookieError::Host("read failed".into()));
        }

        let entries = self.entries.lock();
        let pairs: Vec<String> = entries.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        Ok(pairs.join("; "))
    }

    fn write_raw(&self, line: &str) -> Result<()> {
        self.check_usable()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CookieError::Host("write rejected".into()));
        }

        let mut parts = line.split(';');
        let (name, value) = parts
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or_else(|| CookieError::Host(format!("malformed cookie line: {}", line)))?;
        let name = name.trim().to_string();

        let mut expired = false;
        for attr in parts {
            let Some((key, val)) = attr.trim().split_once('=') else {
                continue;
            };
            if key.eq_ignore_ascii_case("max-age") {
                if let Ok(seconds) = val.trim().parse::<i64>() {
                    expired |= seconds <= 0;
                }
            } else if key.eq_ignore_ascii_case("expires") {
                if let Ok(at) = DateTime::parse_from_rfc2822(val.trim()) {
                    expired |= at.with_timezone(&Utc) <= Utc::now();
                }
            }
        }

        self.written.lock().push(line.to_string());

        let mut entries = self.entries.lock();
        if expired {
            entries.remove(&name);
        } else {
            entries.insert(name, value.trim().to_string());
        }
        Ok(())
    }
}
