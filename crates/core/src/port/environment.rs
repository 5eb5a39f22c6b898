// Environment Port (for testability)

/// Process environment lookup
pub trait Environment: Send + Sync {
    /// Value of `key`, `None` when unset or not valid unicode
    fn var(&self, key: &str) -> Option<String>;
}

/// Real process environment (production)
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;

    /// Fixed in-memory environment
    #[derive(Default)]
    pub struct MapEnvironment {
        vars: HashMap<String, String>,
    }

    impl MapEnvironment {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
            self.vars.insert(key.into(), value.into());
            self
        }
    }

    impl Environment for MapEnvironment {
        fn var(&self, key: &str) -> Option<String> {
            self.vars.get(key).cloned()
        }
    }
}
