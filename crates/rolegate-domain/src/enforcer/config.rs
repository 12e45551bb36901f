//! Configuration for the enforcer.

use crate::resolver::ResolverConfig;

/// Configuration for the enforcer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcerConfig {
    /// Role resolution limits.
    pub resolver: ResolverConfig,
    /// Hold a single-writer lock across each load-mutate-save sequence.
    pub serialize_mutations: bool,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            serialize_mutations: true,
        }
    }
}

impl EnforcerConfig {
    /// Creates a new configuration with the specified role depth limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.resolver = self.resolver.with_max_depth(max_depth);
        self
    }

    /// Creates a new configuration with mutation serialisation on or off.
    pub fn with_serialized_mutations(mut self, enabled: bool) -> Self {
        self.serialize_mutations = enabled;
        self
    }
}
