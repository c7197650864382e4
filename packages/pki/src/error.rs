//! Error handling for key generation, issuance and trust-material loading

use thiserror::Error;

/// PKI-specific errors
#[derive(Debug, Error)]
pub enum PkiError {
    /// The operating system random source failed
    #[error("Entropy source failed during {step}: {reason}")]
    Entropy {
        /// Operation that was drawing randomness
        step: &'static str,
        /// Underlying failure
        reason: String,
    },

    /// DER or PEM marshalling of well-formed data failed
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// A required entry is absent from the secret store
    #[error("Store entry '{entry}' not found")]
    MissingEntry {
        /// Store key that was looked up
        entry: String,
    },

    /// The bytes do not contain a decodable PEM block
    #[error("Malformed PEM in '{entry}': {reason}")]
    MalformedPem {
        /// Store key or label of the offending input
        entry: String,
        /// Underlying failure
        reason: String,
    },

    /// The PEM block carries a different type tag than expected
    #[error("Wrong PEM type in '{entry}': expected '{expected}', found '{found}'")]
    UnexpectedBlockType {
        /// Store key or label of the offending input
        entry: String,
        /// Tag that was required
        expected: &'static str,
        /// Tag that was present
        found: String,
    },

    /// The DER body is not a valid P-256 private key
    #[error("Unable to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// The DER body is not a valid X.509 certificate
    #[error("Unable to parse certificate: {0}")]
    InvalidCertificate(String),

    /// The CA private key does not belong to the CA certificate
    #[error("CA private key does not match the public key of the CA certificate")]
    KeyMismatch,

    /// The loaded certificate may not sign other certificates
    #[error("Certificate is not a certificate authority: {0}")]
    NotCertificateAuthority(String),

    /// A host certificate was requested without any DNS identity
    #[error("Host certificate requires at least one DNS name")]
    NoDnsNames,

    /// A DNS name cannot be encoded into a certificate
    #[error("Invalid DNS name '{name}': {reason}")]
    InvalidDnsName {
        /// Name as supplied by the caller
        name: String,
        /// Underlying failure
        reason: String,
    },

    /// The requested validity window cannot be represented
    #[error("Invalid validity period: {0}")]
    InvalidValidity(String),

    /// Certificate construction or signing failed
    #[error("Failed to generate certificate: {0}")]
    Issuance(String),

    /// A certificate did not verify against its trust anchor
    #[error("Certificate verification failed: {0}")]
    Verification(String),
}

impl PkiError {
    /// Create an `Entropy` error for the given step
    pub fn entropy(step: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Entropy {
            step,
            reason: err.to_string(),
        }
    }

    /// Create an `Encoding` error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create an `Issuance` error
    pub fn issuance(msg: impl Into<String>) -> Self {
        Self::Issuance(msg.into())
    }

    /// Create a `Verification` error
    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    /// Whether the error was caused by stored material rather than the request
    /// or the environment
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MissingEntry { .. }
                | Self::MalformedPem { .. }
                | Self::UnexpectedBlockType { .. }
                | Self::InvalidPrivateKey(_)
                | Self::InvalidCertificate(_)
                | Self::KeyMismatch
                | Self::NotCertificateAuthority(_)
        )
    }
}

/// Result type for PKI operations
pub type Result<T> = std::result::Result<T, PkiError>;
