//! Host certificate issuance under a loaded CA

use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, Issuer,
    KeyUsagePurpose, SanType,
};
use tracing::info;

use crate::encoding::{CERTIFICATE_TAG, encode_block};
use crate::error::{PkiError, Result};
use crate::key::EcKeyPair;
use crate::serial::Serial;
use crate::store::SecretStore;
use crate::trust::TrustMaterial;
use crate::validity::ValidityWindow;

/// Load the CA from `store` and issue a host certificate for `key`
///
/// The first DNS name is also the subject common name.
pub fn host_certificate_pem<S, N>(
    store: &S,
    ttl_years: u32,
    key: &EcKeyPair,
    dns_names: &[N],
) -> Result<Vec<u8>>
where
    S: SecretStore + ?Sized,
    N: AsRef<str>,
{
    let trust = TrustMaterial::load(store)?;
    issue_host_certificate(&trust, key, ttl_years, dns_names)
}

/// Issue a host certificate for `key`, signed by the CA in `trust`
pub fn issue_host_certificate<N: AsRef<str>>(
    trust: &TrustMaterial,
    key: &EcKeyPair,
    ttl_years: u32,
    dns_names: &[N],
) -> Result<Vec<u8>> {
    let window = ValidityWindow::from_now(ttl_years)?;
    let serial = Serial::random()?;
    let params = host_params(dns_names, window, serial)?;

    let ca_key = trust.key().to_signing_key()?;
    let issuer = Issuer::from_ca_cert_pem(&trust.certificate().pem(), ca_key)
        .map_err(|e| PkiError::issuance(format!("CA issuer from certificate: {e}")))?;

    let subject_key = key.to_signing_key()?;
    let cert = params
        .signed_by(&subject_key, &issuer)
        .map_err(|e| PkiError::issuance(format!("host certificate signed by CA: {e}")))?;

    info!(
        %serial,
        common_name = dns_names[0].as_ref(),
        dns_names = dns_names.len(),
        not_after = %window.not_after,
        "Issued host certificate"
    );

    Ok(encode_block(CERTIFICATE_TAG, cert.der()).into_bytes())
}

fn host_params<N: AsRef<str>>(
    dns_names: &[N],
    window: ValidityWindow,
    serial: Serial,
) -> Result<CertificateParams> {
    let Some(common_name) = dns_names.first() else {
        return Err(PkiError::NoDnsNames);
    };

    let mut params = CertificateParams::default();
    params.serial_number = Some(serial.into());
    params.not_before = window.not_before;
    params.not_after = window.not_after;
    params.is_ca = IsCa::NoCa;

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name.as_ref());
    params.distinguished_name = dn;

    params.key_usages = vec![
        KeyUsagePurpose::KeyEncipherment,
        KeyUsagePurpose::DigitalSignature,
    ];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ClientAuth,
        ExtendedKeyUsagePurpose::ServerAuth,
    ];
    params.subject_alt_names = dns_sans(dns_names)?;
    params.use_authority_key_identifier_extension = true;

    Ok(params)
}

/// SAN entries in caller order; IP-looking names stay DNS names
fn dns_sans<N: AsRef<str>>(dns_names: &[N]) -> Result<Vec<SanType>> {
    dns_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(PkiError::InvalidDnsName {
                    name: String::new(),
                    reason: "empty name".to_string(),
                });
            }
            let ia5 = name.try_into().map_err(|e: rcgen::Error| PkiError::InvalidDnsName {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            Ok(SanType::DnsName(ia5))
        })
        .collect()
}
