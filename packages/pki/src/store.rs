//! Read access to the secret store holding CA material
//!
//! The CA key and certificate arrive as named byte blobs, typically the data
//! section of a cluster secret. Only lookups are needed here; writing issued
//! material back is the caller's job.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::{PkiError, Result};

/// Store entry holding the CA private key
pub const DEFAULT_KEY_ENTRY: &str = "tls.key";

/// Store entry holding the CA certificate
pub const DEFAULT_CERT_ENTRY: &str = "tls.crt";

/// Narrow read capability over a string-keyed blob store
pub trait SecretStore {
    /// Bytes stored under `key`, if any
    fn get(&self, key: &str) -> Option<&[u8]>;

    /// Bytes stored under `key`, or `MissingEntry`
    fn require(&self, key: &str) -> Result<&[u8]> {
        self.get(key).ok_or_else(|| PkiError::MissingEntry {
            entry: key.to_string(),
        })
    }
}

impl<S: BuildHasher> SecretStore for HashMap<String, Vec<u8>, S> {
    fn get(&self, key: &str) -> Option<&[u8]> {
        HashMap::get(self, key).map(Vec::as_slice)
    }
}

impl SecretStore for BTreeMap<String, Vec<u8>> {
    fn get(&self, key: &str) -> Option<&[u8]> {
        BTreeMap::get(self, key).map(Vec::as_slice)
    }
}

impl<T: SecretStore + ?Sized> SecretStore for &T {
    fn get(&self, key: &str) -> Option<&[u8]> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_lookup() {
        let mut store = HashMap::new();
        store.insert(DEFAULT_KEY_ENTRY.to_string(), b"key".to_vec());
        assert_eq!(SecretStore::get(&store, DEFAULT_KEY_ENTRY), Some(&b"key"[..]));
        assert_eq!(SecretStore::get(&store, DEFAULT_CERT_ENTRY), None);
    }

    #[test]
    fn require_reports_missing_entry() {
        let store: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        match store.require(DEFAULT_CERT_ENTRY) {
            Err(PkiError::MissingEntry { entry }) => assert_eq!(entry, DEFAULT_CERT_ENTRY),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_entry_is_present() {
        let mut store = BTreeMap::new();
        store.insert(DEFAULT_KEY_ENTRY.to_string(), Vec::new());
        assert_eq!(store.require(DEFAULT_KEY_ENTRY).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn references_delegate() {
        let mut store = HashMap::new();
        store.insert(DEFAULT_CERT_ENTRY.to_string(), b"crt".to_vec());
        let borrowed = &store;
        assert_eq!(SecretStore::get(&borrowed, DEFAULT_CERT_ENTRY), Some(&b"crt"[..]));
    }
}
