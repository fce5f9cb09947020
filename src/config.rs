//! Per-decoder configuration.

/// Default bound on nested values, see [`DecoderConfig::max_depth`].
pub const DEFAULT_MAX_DEPTH: u32 = 128;

/// Configuration for a [`crate::Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum number of nested values being decoded at once.
    pub(crate) max_depth: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    /// Create a new config with default settings.
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound how deeply values may nest (records in records, sequences of
    /// sequences, ...).
    ///
    /// Recursive types such as `struct Node { children: Vec<Node> }` would
    /// otherwise let a hostile input exhaust the stack. The top-level value
    /// counts as depth 1.
    pub const fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the configured nesting bound.
    pub const fn depth_limit(&self) -> u32 {
        self.max_depth
    }
}
