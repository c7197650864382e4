//! Certificate authority operations
//!
//! - `root`: self-signed CA certificates
//! - `host`: leaf certificates signed by a loaded CA
//!
//! [`CertificateAuthority`] bundles the four operations a bootstrap tool
//! composes: generate a key, self-sign it into a root, load an existing root
//! from a store, and issue host certificates under it.

pub mod host;
pub mod root;

use zeroize::Zeroizing;

pub use host::{host_certificate_pem, issue_host_certificate};
pub use root::self_signed_certificate_pem;

use crate::config::TrustStoreConfig;
use crate::error::Result;
use crate::key::{EcKeyPair, private_key_pem};
use crate::store::SecretStore;
use crate::trust::TrustMaterial;

/// Entry point for key generation, CA bootstrap and host issuance
#[derive(Debug, Clone, Default)]
pub struct CertificateAuthority {
    config: TrustStoreConfig,
}

impl CertificateAuthority {
    /// Authority reading the default `tls.key`/`tls.crt` layout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Authority reading trust material with the given layout
    #[must_use]
    pub fn with_config(config: TrustStoreConfig) -> Self {
        Self { config }
    }

    /// Store layout in use
    pub fn config(&self) -> &TrustStoreConfig {
        &self.config
    }

    /// Generate a fresh key pair and its PEM encoding
    pub fn generate_key_pair(&self) -> Result<(EcKeyPair, Zeroizing<Vec<u8>>)> {
        private_key_pem()
    }

    /// Self-sign `key` into a root CA certificate
    pub fn issue_root_certificate(
        &self,
        key: &EcKeyPair,
        name: &str,
        role: &str,
        ttl_years: u32,
    ) -> Result<Vec<u8>> {
        self_signed_certificate_pem(name, role, ttl_years, key)
    }

    /// Load the CA key and certificate from `store`
    pub fn load_trust_material<S: SecretStore + ?Sized>(&self, store: &S) -> Result<TrustMaterial> {
        TrustMaterial::load_with(store, &self.config)
    }

    /// Issue a host certificate for `key` under the CA in `trust`
    pub fn issue_host_certificate<N: AsRef<str>>(
        &self,
        trust: &TrustMaterial,
        key: &EcKeyPair,
        ttl_years: u32,
        dns_names: &[N],
    ) -> Result<Vec<u8>> {
        issue_host_certificate(trust, key, ttl_years, dns_names)
    }
}
