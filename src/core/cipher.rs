// Seam for an external decryption routine applied to opaque record spans.
// The crate ships no cipher; callers plug one in and pass key material they obtained elsewhere.
use crate::core::error::{Error, ErrorKind};
use crate::core::record::Record;

pub trait SpanDecryptor {
    fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error>;
}

impl<F> SpanDecryptor for F
where
    F: Fn(&[u8], &[u8], &[u8]) -> Result<Vec<u8>, Error>,
{
    fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        self(key, iv, ciphertext)
    }
}

/// Hands the leaf bytes at `path` (e.g. `data2.encrypted`) to `decryptor`.
pub fn decrypt_field(
    record: &Record,
    path: &str,
    decryptor: &dyn SpanDecryptor,
    key: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>, Error> {
    let ciphertext = record.bytes(path).ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("no byte field at path")
            .with_field(path)
    })?;
    decryptor
        .decrypt(key, iv, ciphertext)
        .map_err(|err| err.with_field(path))
}
