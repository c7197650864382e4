//! P-256 key pairs
//!
//! Keys are generated from the OS random source and serialized as SEC1
//! (`EC PRIVATE KEY`) PEM, the format stored under `tls.key`. Signing goes
//! through rcgen, which takes the same key as PKCS#8.

use std::fmt;

use p256::SecretKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::EncodePrivateKey;
use rcgen::PKCS_ECDSA_P256_SHA256;
use rustls_pki_types::PrivatePkcs8KeyDer;
use zeroize::Zeroizing;

use crate::encoding::{EC_PRIVATE_KEY_TAG, decode_block, encode_block};
use crate::error::{PkiError, Result};

/// A random scalar is out of range with probability ~2^-32; give up after
/// this many draws and report the entropy source as broken.
const MAX_SCALAR_DRAWS: usize = 8;

/// Elliptic-curve (P-256) private key with its derived public point
#[derive(Clone)]
pub struct EcKeyPair {
    secret: SecretKey,
}

impl EcKeyPair {
    /// Generate a fresh key pair
    pub fn generate() -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        for _ in 0..MAX_SCALAR_DRAWS {
            getrandom::fill(&mut bytes[..]).map_err(|e| PkiError::entropy("key generation", e))?;
            if let Ok(secret) = SecretKey::from_slice(&bytes[..]) {
                return Ok(Self { secret });
            }
        }
        Err(PkiError::entropy(
            "key generation",
            "random source produced no valid P-256 scalar",
        ))
    }

    /// Parse a SEC1 DER private key
    pub fn from_sec1_der(der: &[u8]) -> Result<Self> {
        let secret =
            SecretKey::from_sec1_der(der).map_err(|e| PkiError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { secret })
    }

    /// Parse an `EC PRIVATE KEY` PEM block
    pub fn from_pem(label: &str, pem: &[u8]) -> Result<Self> {
        let der = Zeroizing::new(decode_block(label, EC_PRIVATE_KEY_TAG, pem)?);
        Self::from_sec1_der(&der)
    }

    /// SEC1 DER encoding of the private key
    pub fn to_sec1_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        self.secret
            .to_sec1_der()
            .map_err(|e| PkiError::encoding(format!("Unable to marshal EC key: {e}")))
    }

    /// `EC PRIVATE KEY` PEM encoding of the private key
    pub fn to_pem(&self) -> Result<Zeroizing<Vec<u8>>> {
        let der = self.to_sec1_der()?;
        Ok(Zeroizing::new(
            encode_block(EC_PRIVATE_KEY_TAG, &der).into_bytes(),
        ))
    }

    /// Uncompressed SEC1 encoding of the public point (`0x04 || X || Y`)
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    /// Convert into an rcgen signing key
    pub(crate) fn to_signing_key(&self) -> Result<rcgen::KeyPair> {
        let pkcs8 = self
            .secret
            .to_pkcs8_der()
            .map_err(|e| PkiError::encoding(format!("Unable to marshal PKCS#8 key: {e}")))?;
        let pkcs8 = PrivatePkcs8KeyDer::from(pkcs8.as_bytes().to_vec());
        rcgen::KeyPair::from_pkcs8_der_and_sign_algo(&pkcs8, &PKCS_ECDSA_P256_SHA256)
            .map_err(|e| PkiError::issuance(format!("Unable to load signing key: {e}")))
    }
}

impl PartialEq for EcKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.secret.public_key() == other.secret.public_key()
    }
}

impl Eq for EcKeyPair {}

impl fmt::Debug for EcKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeyPair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

/// Generate a key pair and its `EC PRIVATE KEY` PEM encoding
pub fn private_key_pem() -> Result<(EcKeyPair, Zeroizing<Vec<u8>>)> {
    let key = EcKeyPair::generate()?;
    let pem = key.to_pem()?;
    tracing::debug!("Generated P-256 key pair");
    Ok((key, pem))
}
