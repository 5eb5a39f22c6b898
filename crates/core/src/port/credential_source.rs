// Credential Source Port

use crate::domain::Credential;

/// Resolves the connection credential for one invocation.
///
/// Implementations must not cache: the user may log in again between calls.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self) -> Option<Credential>;
}

pub mod mocks {
    use super::*;

    /// Always returns the same credential (or none)
    pub struct StaticCredentialSource(pub Option<Credential>);

    impl CredentialSource for StaticCredentialSource {
        fn resolve(&self) -> Option<Credential> {
            self.0.clone()
        }
    }
}
