// Connection Resolver - env var first, then the per-user config file

use atxp_mcp_core::domain::{Credential, CONNECTION_ENV_VAR};
use atxp_mcp_core::port::{ConfigReader, CredentialSource, Environment};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves `ATXP_CONNECTION` on every call.
///
/// The file is only touched when the environment variable is unset or
/// empty. Read errors are logged and treated as "no credential".
pub struct ConnectionResolver {
    env: Arc<dyn Environment>,
    reader: Arc<dyn ConfigReader>,
    config_path: PathBuf,
}

impl ConnectionResolver {
    /// Create a new resolver
    ///
    /// # Arguments
    /// * `env` - Process environment lookup
    /// * `reader` - Config file reader
    /// * `config_path` - Expanded path of the credential file (`~/.atxp/config`)
    pub fn new(
        env: Arc<dyn Environment>,
        reader: Arc<dyn ConfigReader>,
        config_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            env,
            reader,
            config_path: config_path.into(),
        }
    }

    fn from_file(&self) -> Option<Credential> {
        match self.reader.read(&self.config_path) {
            Ok(Some(contents)) => {
                let credential = Credential::from_config_contents(&contents);
                debug!(
                    path = %self.config_path.display(),
                    found = credential.is_some(),
                    "Read credential file"
                );
                credential
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    path = %self.config_path.display(),
                    error = %e,
                    "Failed to read credential file, continuing without credential"
                );
                None
            }
        }
    }
}

impl CredentialSource for ConnectionResolver {
    fn resolve(&self) -> Option<Credential> {
        if let Some(value) = self.env.var(CONNECTION_ENV_VAR).filter(|v| !v.is_empty()) {
            return Some(Credential::new(value));
        }
        self.from_file()
    }
}
