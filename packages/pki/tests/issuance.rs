//! End-to-end issuance: root bootstrap, trust loading and host certificates

use std::collections::HashMap;

use kgate_pki::{
    CertificateAuthority, CertificateInfo, EcKeyPair, PkiError, Result, TrustMaterial,
    host_certificate_pem, private_key_pem, self_signed_certificate_pem, verify_issued_by,
};

struct Bootstrap {
    key: EcKeyPair,
    cert_pem: Vec<u8>,
    store: HashMap<String, Vec<u8>>,
}

fn bootstrap_ca(name: &str, role: &str) -> Result<Bootstrap> {
    let (key, key_pem) = private_key_pem()?;
    let cert_pem = self_signed_certificate_pem(name, role, 10, &key)?;

    let mut store = HashMap::new();
    store.insert("tls.key".to_string(), key_pem.to_vec());
    store.insert("tls.crt".to_string(), cert_pem.clone());

    Ok(Bootstrap {
        key,
        cert_pem,
        store,
    })
}

#[test]
fn root_certificate_is_self_verifying_ca() {
    let (k1, _) = private_key_pem().unwrap();
    let c1 = self_signed_certificate_pem("ca", "root", 10, &k1).unwrap();

    let info = CertificateInfo::from_pem(&c1).unwrap();
    assert!(info.is_ca);
    assert!(info.self_issued);
    verify_issued_by(&c1, &c1).unwrap();
}

#[test]
fn root_certificate_fields() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let info = CertificateInfo::from_pem(&ca.cert_pem).unwrap();

    assert!(info.key_usage.key_cert_sign);
    assert!(info.key_usage.crl_sign);
    assert!(info.key_usage.digital_signature);
    assert!(!info.has_extended_key_usage);
    assert!(info.dns_names.is_empty());
    assert_eq!(info.subject_common_name.as_deref(), Some("ca"));
    assert!(info.serial_number().is_some_and(|serial| serial > 0 && serial <= u64::from(u32::MAX)));
}

#[test]
fn root_with_empty_name_has_empty_subject() {
    let (key, _) = private_key_pem().unwrap();
    let cert = self_signed_certificate_pem("", "", 1, &key).unwrap();

    let info = CertificateInfo::from_pem(&cert).unwrap();
    assert_eq!(info.subject_common_name, None);
    assert!(info.is_ca);
    verify_issued_by(&cert, &cert).unwrap();
}

#[test]
fn host_certificate_chains_to_root() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let trust = TrustMaterial::load(&ca.store).unwrap();

    let (k2, _) = private_key_pem().unwrap();
    let c2 = CertificateAuthority::new()
        .issue_host_certificate(&trust, &k2, 1, &["svc.cluster.local"])
        .unwrap();

    verify_issued_by(&c2, &ca.cert_pem).unwrap();

    let info = CertificateInfo::from_pem(&c2).unwrap();
    assert!(!info.is_ca);
    assert_eq!(info.dns_names, ["svc.cluster.local"]);
    assert_eq!(info.subject_common_name.as_deref(), Some("svc.cluster.local"));
    assert_eq!(info.issuer_common_name.as_deref(), Some("ca"));
}

#[test]
fn host_certificate_fields() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let (key, _) = private_key_pem().unwrap();
    let names = ["api.svc", "api.svc.cluster.local", "api"];
    let cert = host_certificate_pem(&ca.store, 2, &key, &names).unwrap();

    let info = CertificateInfo::from_pem(&cert).unwrap();
    assert!(!info.is_ca);
    assert!(!info.self_issued);
    assert_eq!(info.dns_names, names);
    assert_eq!(info.subject_common_name.as_deref(), Some("api.svc"));
    assert!(info.key_usage.digital_signature);
    assert!(info.key_usage.key_encipherment);
    assert!(!info.key_usage.key_cert_sign);
    assert!(!info.key_usage.crl_sign);
    assert!(info.client_auth);
    assert!(info.server_auth);
}

#[test]
fn host_certificate_rejected_by_other_ca() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let other = bootstrap_ca("ca", "root").unwrap();

    let (key, _) = private_key_pem().unwrap();
    let cert = host_certificate_pem(&ca.store, 1, &key, &["svc.cluster.local"]).unwrap();

    verify_issued_by(&cert, &ca.cert_pem).unwrap();
    let err = verify_issued_by(&cert, &other.cert_pem).unwrap_err();
    assert!(matches!(err, PkiError::Verification(_)));
}

#[test]
fn host_certificate_is_not_a_trust_anchor() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let (key, _) = private_key_pem().unwrap();
    let host = host_certificate_pem(&ca.store, 1, &key, &["svc.cluster.local"]).unwrap();

    let err = verify_issued_by(&host, &host).unwrap_err();
    assert!(matches!(err, PkiError::NotCertificateAuthority(_)));
}

#[test]
fn successive_certificates_get_fresh_serials() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let (key, _) = private_key_pem().unwrap();

    let first = host_certificate_pem(&ca.store, 1, &key, &["a.local"]).unwrap();
    let second = host_certificate_pem(&ca.store, 1, &key, &["a.local"]).unwrap();

    let first = CertificateInfo::from_pem(&first).unwrap();
    let second = CertificateInfo::from_pem(&second).unwrap();
    assert_ne!(first.serial, second.serial);
}

#[test]
fn host_certificate_requires_dns_name() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let (key, _) = private_key_pem().unwrap();
    let names: Vec<String> = Vec::new();

    let err = host_certificate_pem(&ca.store, 1, &key, &names).unwrap_err();
    assert!(matches!(err, PkiError::NoDnsNames));
}

#[test]
fn host_issuance_surfaces_loading_failure() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let mut store = ca.store.clone();
    store.remove("tls.crt");

    let (key, _) = private_key_pem().unwrap();
    let err = host_certificate_pem(&store, 1, &key, &["svc.cluster.local"]).unwrap_err();
    assert!(matches!(err, PkiError::MissingEntry { ref entry } if entry == "tls.crt"));
}

#[test]
fn facade_runs_full_bootstrap() {
    let authority = CertificateAuthority::new();

    let (ca_key, ca_key_pem) = authority.generate_key_pair().unwrap();
    let ca_cert = authority
        .issue_root_certificate(&ca_key, "cluster-ca", "root", 5)
        .unwrap();

    let mut store = HashMap::new();
    store.insert("tls.key".to_string(), ca_key_pem.to_vec());
    store.insert("tls.crt".to_string(), ca_cert.clone());

    let trust = authority.load_trust_material(&store).unwrap();
    assert_eq!(trust.key(), &ca_key);

    let (host_key, _) = authority.generate_key_pair().unwrap();
    let host_cert = authority
        .issue_host_certificate(&trust, &host_key, 1, &["node-1.cluster.local".to_string()])
        .unwrap();

    verify_issued_by(&host_cert, &ca_cert).unwrap();
    verify_issued_by(&ca_cert, &ca_cert).unwrap();
}

#[test]
fn bootstrap_key_is_used_for_signing() {
    let ca = bootstrap_ca("ca", "root").unwrap();
    let trust = TrustMaterial::load(&ca.store).unwrap();
    assert_eq!(trust.key(), &ca.key);
    assert_eq!(
        trust.certificate().public_key_bytes(),
        ca.key.public_key_bytes().as_slice()
    );
}
