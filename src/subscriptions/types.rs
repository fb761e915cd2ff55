//! Binding configuration types.

use crate::types::ReadOptions;

/// Where a binding runs.
///
/// Only interactive surfaces (something is displaying the cookies and can
/// react to changes) register a listener. Static surfaces, such as a
/// one-shot server-side render, take a single snapshot and never update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Surface {
    #[default]
    Interactive,
    Static,
}

/// Configuration for a binding.
#[derive(Clone, Debug)]
pub struct BindingConfig {
    /// Cookie names this consumer depends on (None or empty = all names).
    pub dependencies: Option<Vec<String>>,

    /// How snapshots are decoded.
    pub read: ReadOptions,

    /// Whether to observe changes at all.
    pub surface: Surface,

    /// Max queued snapshots. When full, the oldest is dropped.
    /// Default: 64
    pub buffer_size: usize,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            dependencies: None,
            read: ReadOptions::default(),
            surface: Surface::default(),
            buffer_size: 64,
        }
    }
}

impl BindingConfig {
    /// Observe only changes to `names`.
    pub fn watching<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dependencies: Some(names.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn with_read(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}
