//! Relevance check for change notifications.

use crate::types::Snapshot;

/// Whether a change from `old` to `new` matters to a consumer.
///
/// Without dependencies every change matters. Otherwise only a difference
/// in one of the named cookies does (a cookie appearing or disappearing
/// counts as a difference).
///
/// Values are compared by `Value` equality, including containers. Snapshots
/// are rebuilt on every read, so there is no container identity to compare;
/// rewriting an equal JSON object to a watched cookie is not a change.
pub fn should_update(dependencies: Option<&[String]>, new: &Snapshot, old: &Snapshot) -> bool {
    match dependencies {
        None => true,
        Some([]) => true,
        Some(names) => names.iter().any(|name| new.get(name) != old.get(name)),
    }
}

/// Per-consumer selective update state.
///
/// The baseline advances to every evaluated snapshot, delivered or not.
#[derive(Clone, Debug)]
pub struct SelectiveUpdate {
    dependencies: Option<Vec<String>>,
    baseline: Snapshot,
}

impl SelectiveUpdate {
    pub fn new(dependencies: Option<Vec<String>>, baseline: Snapshot) -> Self {
        Self {
            dependencies,
            baseline,
        }
    }

    pub fn dependencies(&self) -> Option<&[String]> {
        self.dependencies.as_deref()
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Compare `next` against the baseline, then make it the new baseline.
    ///
    /// Returns `Some(next)` when the consumer should be given it.
    pub fn evaluate(&mut self, next: Snapshot) -> Option<Snapshot> {
        let relevant = should_update(self.dependencies(), &next, &self.baseline);
        let delivered = relevant.then(|| next.clone());
        self.baseline = next;
        delivered
    }
}
