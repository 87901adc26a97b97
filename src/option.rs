/// Depth limit applied by [`ConvertOption::default`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration for the guarded [`Converter`](crate::Converter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOption {
    pub(crate) max_depth: usize,
}

impl Default for ConvertOption {
    fn default() -> Self {
        ConvertOption {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOption {
    /// Rejects input trees with more than `max_depth` nodes on any path.
    ///
    /// Conversion recurses once per level, so this bounds stack usage.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Currently configured depth limit.
    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}
