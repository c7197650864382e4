//! Trust store configuration
//!
//! Names the store entries the CA material is read from and whether the key
//! and certificate are checked against each other on load.

use serde::{Deserialize, Serialize};

use crate::store::{DEFAULT_CERT_ENTRY, DEFAULT_KEY_ENTRY};

/// Layout of the store holding CA trust material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustStoreConfig {
    /// Entry holding the `EC PRIVATE KEY` PEM
    pub key_entry: String,
    /// Entry holding the `CERTIFICATE` PEM
    pub cert_entry: String,
    /// Reject trust material whose key does not match the certificate
    pub verify_key_pair: bool,
}

impl Default for TrustStoreConfig {
    fn default() -> Self {
        Self {
            key_entry: DEFAULT_KEY_ENTRY.to_string(),
            cert_entry: DEFAULT_CERT_ENTRY.to_string(),
            verify_key_pair: true,
        }
    }
}

impl TrustStoreConfig {
    /// Layout of a Kubernetes `kubernetes.io/tls` secret
    #[must_use]
    pub fn kubernetes_tls() -> Self {
        Self::default()
    }

    /// Default entry names without key/certificate cross-validation
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            verify_key_pair: false,
            ..Self::default()
        }
    }

    /// Read the CA key from `entry`
    #[must_use]
    pub fn key_entry(self, entry: impl Into<String>) -> Self {
        Self {
            key_entry: entry.into(),
            ..self
        }
    }

    /// Read the CA certificate from `entry`
    #[must_use]
    pub fn cert_entry(self, entry: impl Into<String>) -> Self {
        Self {
            cert_entry: entry.into(),
            ..self
        }
    }
}
