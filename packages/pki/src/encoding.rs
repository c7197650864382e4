//! PEM envelope handling
//!
//! Every blob this crate reads or writes is a single PEM block. Decoding takes
//! the first block in the input and insists on its type tag before the DER body
//! is handed to a parser.

use pem::{EncodeConfig, LineEnding, Pem};

use crate::error::{PkiError, Result};

/// PEM type tag of a SEC1 elliptic-curve private key
pub const EC_PRIVATE_KEY_TAG: &str = "EC PRIVATE KEY";

/// PEM type tag of an X.509 certificate
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Wrap DER bytes in a PEM block with LF line endings
pub fn encode_block(tag: &'static str, der: &[u8]) -> String {
    let block = Pem::new(tag, der.to_vec());
    pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Decode the first PEM block in `bytes` and return its DER body
///
/// `label` names the input in error messages, usually the store entry.
pub fn decode_block(label: &str, expected: &'static str, bytes: &[u8]) -> Result<Vec<u8>> {
    let block = pem::parse(bytes).map_err(|e| PkiError::MalformedPem {
        entry: label.to_string(),
        reason: e.to_string(),
    })?;

    if block.tag() != expected {
        return Err(PkiError::UnexpectedBlockType {
            entry: label.to_string(),
            expected,
            found: block.tag().to_string(),
        });
    }

    Ok(block.into_contents())
}
