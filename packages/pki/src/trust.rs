//! CA trust material loading
//!
//! Reconstructs the CA private key and certificate from a [`SecretStore`].
//! Each blob must be a single PEM block with the expected type tag and a DER
//! body that parses; nothing degrades to a partial result.

use der::Decode;
use der::oid::AssociatedOid;
use tracing::{debug, warn};
use x509_cert::Certificate;
use x509_cert::ext::pkix::BasicConstraints;

use crate::config::TrustStoreConfig;
use crate::encoding::{CERTIFICATE_TAG, decode_block, encode_block};
use crate::error::{PkiError, Result};
use crate::key::EcKeyPair;
use crate::store::{DEFAULT_CERT_ENTRY, DEFAULT_KEY_ENTRY, SecretStore};

/// Parsed CA certificate together with its DER encoding
#[derive(Debug, Clone)]
pub struct CaCertificate {
    der: Vec<u8>,
    certificate: Certificate,
}

impl CaCertificate {
    /// Parse a DER-encoded X.509 certificate
    pub fn from_der(der: Vec<u8>) -> Result<Self> {
        let certificate =
            Certificate::from_der(&der).map_err(|e| PkiError::InvalidCertificate(e.to_string()))?;
        Ok(Self { der, certificate })
    }

    /// Parse a `CERTIFICATE` PEM block
    pub fn from_pem(label: &str, pem: &[u8]) -> Result<Self> {
        Self::from_der(decode_block(label, CERTIFICATE_TAG, pem)?)
    }

    /// DER encoding
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// PEM encoding
    pub fn pem(&self) -> String {
        encode_block(CERTIFICATE_TAG, &self.der)
    }

    /// Parsed certificate structure
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Raw subject public key (an uncompressed point for EC keys)
    pub fn public_key_bytes(&self) -> &[u8] {
        self.certificate
            .tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .raw_bytes()
    }

    /// Whether the basic constraints extension marks this certificate as a CA
    pub fn is_ca(&self) -> bool {
        let Some(extensions) = &self.certificate.tbs_certificate.extensions else {
            return false;
        };
        extensions
            .iter()
            .filter(|ext| ext.extn_id == BasicConstraints::OID)
            .filter_map(|ext| BasicConstraints::from_der(ext.extn_value.as_bytes()).ok())
            .any(|constraints| constraints.ca)
    }
}

/// Load the CA private key from the default `tls.key` entry
pub fn load_private_key<S: SecretStore + ?Sized>(store: &S) -> Result<EcKeyPair> {
    load_private_key_from(store, DEFAULT_KEY_ENTRY)
}

/// Load the CA certificate from the default `tls.crt` entry
pub fn load_certificate<S: SecretStore + ?Sized>(store: &S) -> Result<CaCertificate> {
    load_certificate_from(store, DEFAULT_CERT_ENTRY)
}

/// Load a private key from `entry`
pub fn load_private_key_from<S: SecretStore + ?Sized>(store: &S, entry: &str) -> Result<EcKeyPair> {
    let bytes = store.require(entry)?;
    let key = EcKeyPair::from_pem(entry, bytes)?;
    debug!(entry, "Loaded CA private key");
    Ok(key)
}

/// Load a certificate from `entry`
pub fn load_certificate_from<S: SecretStore + ?Sized>(
    store: &S,
    entry: &str,
) -> Result<CaCertificate> {
    let bytes = store.require(entry)?;
    let certificate = CaCertificate::from_pem(entry, bytes)?;
    debug!(entry, "Loaded CA certificate");
    Ok(certificate)
}

/// CA private key and certificate, ready to sign host certificates
#[derive(Debug, Clone)]
pub struct TrustMaterial {
    key: EcKeyPair,
    certificate: CaCertificate,
}

impl TrustMaterial {
    /// Load from the default `tls.key`/`tls.crt` layout
    pub fn load<S: SecretStore + ?Sized>(store: &S) -> Result<Self> {
        Self::load_with(store, &TrustStoreConfig::default())
    }

    /// Load using the given store layout
    pub fn load_with<S: SecretStore + ?Sized>(store: &S, config: &TrustStoreConfig) -> Result<Self> {
        let key = load_private_key_from(store, &config.key_entry)?;
        let certificate = load_certificate_from(store, &config.cert_entry)?;
        Self::assemble(key, certificate, config.verify_key_pair)
    }

    /// Pair a key with a certificate after checking that they belong together
    pub fn from_parts(key: EcKeyPair, certificate: CaCertificate) -> Result<Self> {
        Self::assemble(key, certificate, true)
    }

    fn assemble(key: EcKeyPair, certificate: CaCertificate, verify_key_pair: bool) -> Result<Self> {
        if !certificate.is_ca() {
            return Err(PkiError::NotCertificateAuthority(
                "basic constraints do not allow signing".to_string(),
            ));
        }
        if verify_key_pair && key.public_key_bytes() != certificate.public_key_bytes() {
            warn!("CA private key does not match CA certificate");
            return Err(PkiError::KeyMismatch);
        }
        Ok(Self { key, certificate })
    }

    /// CA private key
    pub fn key(&self) -> &EcKeyPair {
        &self.key
    }

    /// CA certificate
    pub fn certificate(&self) -> &CaCertificate {
        &self.certificate
    }
}
