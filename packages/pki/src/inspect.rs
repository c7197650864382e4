//! Certificate inspection and issuer verification
//!
//! Decodes issued certificates back into the fields this crate controls and
//! checks that a certificate was signed by a given trust anchor.

use time::OffsetDateTime;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;
use x509_parser::parse_x509_certificate;

use crate::encoding::{CERTIFICATE_TAG, decode_block};
use crate::error::{PkiError, Result};

/// Key usage bits relevant to issued certificates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyUsageFlags {
    /// digitalSignature
    pub digital_signature: bool,
    /// keyEncipherment
    pub key_encipherment: bool,
    /// keyCertSign
    pub key_cert_sign: bool,
    /// cRLSign
    pub crl_sign: bool,
}

/// Decoded view of an issued certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Big-endian serial number bytes as encoded
    pub serial: Vec<u8>,
    /// Subject common name, if present
    pub subject_common_name: Option<String>,
    /// Issuer common name, if present
    pub issuer_common_name: Option<String>,
    /// Subject and issuer names are byte-identical
    pub self_issued: bool,
    /// Basic constraints CA flag
    pub is_ca: bool,
    /// Key usage extension, all false when absent
    pub key_usage: KeyUsageFlags,
    /// Extended key usage extension is present
    pub has_extended_key_usage: bool,
    /// Extended key usage includes clientAuth
    pub client_auth: bool,
    /// Extended key usage includes serverAuth
    pub server_auth: bool,
    /// DNS subject alternative names in encoded order
    pub dns_names: Vec<String>,
    /// Start of validity
    pub not_before: OffsetDateTime,
    /// End of validity
    pub not_after: OffsetDateTime,
}

impl CertificateInfo {
    /// Inspect a `CERTIFICATE` PEM block
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let der = decode_block("certificate", CERTIFICATE_TAG, pem)?;
        Self::from_der(&der)
    }

    /// Inspect a DER-encoded certificate
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let cert = parse(der)?;

        let key_usage = cert
            .key_usage()
            .map_err(|e| PkiError::InvalidCertificate(format!("key usage: {e}")))?
            .map(|ku| KeyUsageFlags {
                digital_signature: ku.value.digital_signature(),
                key_encipherment: ku.value.key_encipherment(),
                key_cert_sign: ku.value.key_cert_sign(),
                crl_sign: ku.value.crl_sign(),
            })
            .unwrap_or_default();

        let eku = cert
            .extended_key_usage()
            .map_err(|e| PkiError::InvalidCertificate(format!("extended key usage: {e}")))?;
        let (client_auth, server_auth) = eku
            .as_ref()
            .map(|eku| (eku.value.client_auth, eku.value.server_auth))
            .unwrap_or((false, false));

        let dns_names = cert
            .subject_alternative_name()
            .map_err(|e| PkiError::InvalidCertificate(format!("subject alternative name: {e}")))?
            .map(|san| {
                san.value
                    .general_names
                    .iter()
                    .filter_map(|name| match name {
                        GeneralName::DNSName(dns) => Some((*dns).to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            serial: cert.raw_serial().to_vec(),
            subject_common_name: common_name(cert.subject()),
            issuer_common_name: common_name(cert.issuer()),
            self_issued: cert.subject().as_raw() == cert.issuer().as_raw(),
            is_ca: is_ca(&cert)?,
            key_usage,
            has_extended_key_usage: eku.is_some(),
            client_auth,
            server_auth,
            dns_names,
            not_before: cert.validity().not_before.to_datetime(),
            not_after: cert.validity().not_after.to_datetime(),
        })
    }

    /// Serial number as an integer, if it fits in 64 bits
    pub fn serial_number(&self) -> Option<u64> {
        let start = self.serial.iter().position(|&b| b != 0)?;
        let digits = &self.serial[start..];
        if digits.len() > 8 {
            return None;
        }
        Some(digits.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }
}

/// Check that `cert_pem` was issued and signed by the CA in `anchor_pem`
///
/// A root certificate verifies against itself.
pub fn verify_issued_by(cert_pem: &[u8], anchor_pem: &[u8]) -> Result<()> {
    let cert_der = decode_block("certificate", CERTIFICATE_TAG, cert_pem)?;
    let anchor_der = decode_block("trust anchor", CERTIFICATE_TAG, anchor_pem)?;
    let cert = parse(&cert_der)?;
    let anchor = parse(&anchor_der)?;

    if !is_ca(&anchor)? {
        return Err(PkiError::NotCertificateAuthority(
            "trust anchor lacks CA basic constraints".to_string(),
        ));
    }
    if let Some(ku) = anchor
        .key_usage()
        .map_err(|e| PkiError::InvalidCertificate(format!("key usage: {e}")))?
    {
        if !ku.value.key_cert_sign() {
            return Err(PkiError::NotCertificateAuthority(
                "trust anchor key usage excludes certificate signing".to_string(),
            ));
        }
    }
    if cert.issuer().as_raw() != anchor.subject().as_raw() {
        return Err(PkiError::verification(
            "issuer name does not match trust anchor subject",
        ));
    }

    cert.verify_signature(Some(anchor.public_key()))
        .map_err(|e| PkiError::verification(format!("signature: {e}")))
}

fn parse(der: &[u8]) -> Result<X509Certificate<'_>> {
    let (_, cert) =
        parse_x509_certificate(der).map_err(|e| PkiError::InvalidCertificate(e.to_string()))?;
    Ok(cert)
}

fn is_ca(cert: &X509Certificate<'_>) -> Result<bool> {
    Ok(cert
        .basic_constraints()
        .map_err(|e| PkiError::InvalidCertificate(format!("basic constraints: {e}")))?
        .is_some_and(|bc| bc.value.ca))
}

fn common_name(name: &x509_parser::x509::X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
}
