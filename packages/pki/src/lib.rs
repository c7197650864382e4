#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

//! Minimal PKI for internal cluster services
//!
//! Bootstraps TLS trust material without an external certificate authority:
//! a self-signed P-256 root CA and host certificates signed by it, bound to one
//! or more DNS names.
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use kgate_pki::{host_certificate_pem, private_key_pem, self_signed_certificate_pem};
//!
//! # fn main() -> kgate_pki::Result<()> {
//! let (ca_key, ca_key_pem) = private_key_pem()?;
//! let ca_cert_pem = self_signed_certificate_pem("ca", "root", 10, &ca_key)?;
//!
//! let mut secret = HashMap::new();
//! secret.insert("tls.key".to_string(), ca_key_pem.to_vec());
//! secret.insert("tls.crt".to_string(), ca_cert_pem);
//!
//! let (host_key, _host_key_pem) = private_key_pem()?;
//! let _host_cert_pem = host_certificate_pem(&secret, 1, &host_key, &["svc.cluster.local"])?;
//! # Ok(())
//! # }
//! ```
//!
//! Every operation returns a [`PkiError`] instead of aborting; the caller
//! decides whether to retry, report or exit.

pub mod authority;
pub mod config;
pub mod encoding;
pub mod error;
pub mod inspect;
pub mod key;
pub mod serial;
pub mod store;
pub mod trust;
pub mod validity;

pub use authority::{
    CertificateAuthority, host_certificate_pem, issue_host_certificate,
    self_signed_certificate_pem,
};
pub use config::TrustStoreConfig;
pub use encoding::{CERTIFICATE_TAG, EC_PRIVATE_KEY_TAG};
pub use error::{PkiError, Result};
pub use inspect::{CertificateInfo, KeyUsageFlags, verify_issued_by};
pub use key::{EcKeyPair, private_key_pem};
pub use serial::Serial;
pub use store::{DEFAULT_CERT_ENTRY, DEFAULT_KEY_ENTRY, SecretStore};
pub use trust::{CaCertificate, TrustMaterial, load_certificate, load_private_key};
pub use validity::ValidityWindow;
