//! Self-signed root CA issuance

use rcgen::{BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyUsagePurpose};
use tracing::info;

use crate::encoding::{CERTIFICATE_TAG, encode_block};
use crate::error::{PkiError, Result};
use crate::key::EcKeyPair;
use crate::serial::Serial;
use crate::validity::ValidityWindow;

/// Issue a self-signed CA certificate for `key`, valid for `ttl_years`
///
/// `name` becomes the subject common name and `role` the organizational unit;
/// either is left out of the subject when empty.
pub fn self_signed_certificate_pem(
    name: &str,
    role: &str,
    ttl_years: u32,
    key: &EcKeyPair,
) -> Result<Vec<u8>> {
    let window = ValidityWindow::from_now(ttl_years)?;
    issue_root(name, role, window, key)
}

fn issue_root(
    name: &str,
    role: &str,
    window: ValidityWindow,
    key: &EcKeyPair,
) -> Result<Vec<u8>> {
    let serial = Serial::random()?;
    let params = root_params(name, role, window, serial);

    let signing_key = key.to_signing_key()?;
    let cert = params
        .self_signed(&signing_key)
        .map_err(|e| PkiError::issuance(format!("self-signed CA certificate: {e}")))?;

    info!(
        %serial,
        not_after = %window.not_after,
        "Issued root CA certificate"
    );

    Ok(encode_block(CERTIFICATE_TAG, cert.der()).into_bytes())
}

fn root_params(name: &str, role: &str, window: ValidityWindow, serial: Serial) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.serial_number = Some(serial.into());
    params.not_before = window.not_before;
    params.not_after = window.not_after;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.distinguished_name = subject_name(name, role);
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    params.extended_key_usages = Vec::new();
    params
}

fn subject_name(name: &str, role: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    if !name.is_empty() {
        dn.push(DnType::CommonName, name);
    }
    if !role.is_empty() {
        dn.push(DnType::OrganizationalUnitName, role);
    }
    dn
}
