//! HKDF-Schluesselableitung pro Anfrage
//!
//! Der effektive Schluessel einer geschuetzten Anfrage wird per
//! HKDF-SHA512 aus dem Shared Secret der Session abgeleitet. Ein
//! optionales Kontext-Suffix (z.B. der Chunk-Index) fliesst in das
//! Info-Feld ein, damit jeder Chunk unter einem eigenen Schluessel
//! steht und Ciphertext fuer den falschen Index nicht aufgeht.

use hkdf::Hkdf;
use sha2::Sha512;

use crate::error::{KryptoFehler, KryptoResult};
use crate::suite::CipherSuite;
use crate::types::SecretBytes;

const ANFRAGE_INFO: &[u8] = b"kassette-anfrage-schluessel-v1";

/// Leitet den effektiven Anfrage-Schluessel ab
///
/// Laenge richtet sich nach dem Cipher der Suite (32 Bytes fuer
/// AES-256, 24 fuer 3DES).
pub fn anfrage_schluessel(
    shared_secret: &[u8],
    suite: &CipherSuite,
    kontext: Option<&[u8]>,
) -> KryptoResult<SecretBytes> {
    let hk = Hkdf::<Sha512>::new(None, shared_secret);

    let mut info = ANFRAGE_INFO.to_vec();
    if let Some(kontext) = kontext {
        info.push(b'.');
        info.extend_from_slice(kontext);
    }

    let mut okm = vec![0u8; suite.cipher.schluessel_laenge()];
    hk.expand(&info, &mut okm)
        .map_err(|e| KryptoFehler::KeyDerivation(e.to_string()))?;

    Ok(SecretBytes::new(okm))
}
