//! Boundary to the external decryption collaborator.
//!
//! Password-protected workbooks arrive as an OLE compound file wrapping the encrypted package.
//! This crate only detects that wrapper and hands it to a [`Decryptor`]; it carries no
//! cryptography of its own.

use crate::error::{Result, XlfindError};

const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Turns an encrypted workbook container into plain XLSX bytes.
pub trait Decryptor {
    fn decrypt(&self, data: &[u8], password: &str) -> Result<Vec<u8>>;
}

impl<F> Decryptor for F
where
    F: Fn(&[u8], &str) -> Result<Vec<u8>>,
{
    fn decrypt(&self, data: &[u8], password: &str) -> Result<Vec<u8>> {
        self(data, password)
    }
}

/// Returns true if the bytes start with the OLE compound-file signature.
#[must_use]
pub fn is_encrypted_container(bytes: &[u8]) -> bool {
    bytes.starts_with(&OLE_MAGIC)
}

/// Produce parseable workbook bytes.
///
/// Plain XLSX input is returned as-is without consulting the decryptor. Encrypted input needs
/// both a decryptor and a password; any failure is reported as `DecryptionFailed`.
pub fn prepare_bytes(
    data: Vec<u8>,
    decryptor: Option<&dyn Decryptor>,
    password: Option<&str>,
) -> Result<Vec<u8>> {
    if !is_encrypted_container(&data) {
        return Ok(data);
    }

    let Some(decryptor) = decryptor else {
        return Err(XlfindError::DecryptionFailed(
            "workbook is encrypted and no decryptor is configured".to_string(),
        ));
    };
    let Some(password) = password else {
        return Err(XlfindError::DecryptionFailed(
            "workbook is encrypted and no password is configured".to_string(),
        ));
    };

    decryptor.decrypt(&data, password).map_err(|e| match e {
        XlfindError::DecryptionFailed(msg) => XlfindError::DecryptionFailed(msg),
        other => XlfindError::DecryptionFailed(other.to_string()),
    })
}
