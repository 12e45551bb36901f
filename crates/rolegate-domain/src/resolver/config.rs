//! Configuration for the role resolver.

/// Default maximum role hierarchy depth.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Configuration for the role resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum number of grouping hops followed from a subject. Groups
    /// further away are ignored, not reported as an error.
    pub max_depth: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Creates a new configuration with the specified max depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
