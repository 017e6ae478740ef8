//! Symmetrische Ver-/Entschluesselung fuer die verhandelten Suiten
//!
//! Unterstuetzt AES-256 und 3DES jeweils im CBC- (PKCS7-Padding) und
//! OFB-Modus. Der IV wird pro Aufruf frisch gewuerfelt und dem
//! Ciphertext vorangestellt:
//!
//! ```text
//! [iv(16|8)] [ciphertext]
//! ```

use aes::Aes256;
use cipher::{
    block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher,
};
use des::TdesEde3;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{KryptoFehler, KryptoResult};
use crate::suite::{Cipher, CipherModus, CipherSuite};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type TdesCbcEnc = cbc::Encryptor<TdesEde3>;
type TdesCbcDec = cbc::Decryptor<TdesEde3>;
type Aes256Ofb = ofb::Ofb<Aes256>;
type TdesOfb = ofb::Ofb<TdesEde3>;

/// Verschluesselt Klartext unter der Suite; gibt `iv || ciphertext` zurueck
pub fn verschluesseln(
    schluessel: &[u8],
    suite: &CipherSuite,
    klartext: &[u8],
) -> KryptoResult<Vec<u8>> {
    schluessel_laenge_pruefen(schluessel, suite)?;

    let mut iv = vec![0u8; suite.cipher.iv_laenge()];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = match (suite.cipher, suite.modus) {
        (Cipher::Aes, CipherModus::Cbc) => Aes256CbcEnc::new_from_slices(schluessel, &iv)
            .map_err(|e| KryptoFehler::Verschluesselung(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(klartext),
        (Cipher::TripleDes, CipherModus::Cbc) => TdesCbcEnc::new_from_slices(schluessel, &iv)
            .map_err(|e| KryptoFehler::Verschluesselung(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(klartext),
        (Cipher::Aes, CipherModus::Ofb) => keystream::<Aes256Ofb>(schluessel, &iv, klartext)?,
        (Cipher::TripleDes, CipherModus::Ofb) => keystream::<TdesOfb>(schluessel, &iv, klartext)?,
    };

    let mut ausgabe = iv;
    ausgabe.extend_from_slice(&ciphertext);
    Ok(ausgabe)
}

/// Entschluesselt `iv || ciphertext` unter der Suite
pub fn entschluesseln(
    schluessel: &[u8],
    suite: &CipherSuite,
    daten: &[u8],
) -> KryptoResult<Vec<u8>> {
    schluessel_laenge_pruefen(schluessel, suite)?;

    let iv_laenge = suite.cipher.iv_laenge();
    if daten.len() < iv_laenge {
        return Err(KryptoFehler::UngueltigeDaten(
            "Ciphertext kuerzer als der IV".to_string(),
        ));
    }
    let (iv, ciphertext) = daten.split_at(iv_laenge);

    match (suite.cipher, suite.modus) {
        (Cipher::Aes, CipherModus::Cbc) => Aes256CbcDec::new_from_slices(schluessel, iv)
            .map_err(|e| KryptoFehler::Entschluesselung(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| KryptoFehler::Entschluesselung("Padding ungueltig".to_string())),
        (Cipher::TripleDes, CipherModus::Cbc) => TdesCbcDec::new_from_slices(schluessel, iv)
            .map_err(|e| KryptoFehler::Entschluesselung(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| KryptoFehler::Entschluesselung("Padding ungueltig".to_string())),
        (Cipher::Aes, CipherModus::Ofb) => keystream::<Aes256Ofb>(schluessel, iv, ciphertext),
        (Cipher::TripleDes, CipherModus::Ofb) => keystream::<TdesOfb>(schluessel, iv, ciphertext),
    }
}

/// OFB ist in beide Richtungen dieselbe Keystream-Operation
fn keystream<C: KeyIvInit + StreamCipher>(
    schluessel: &[u8],
    iv: &[u8],
    daten: &[u8],
) -> KryptoResult<Vec<u8>> {
    let mut cipher = C::new_from_slices(schluessel, iv)
        .map_err(|e| KryptoFehler::Verschluesselung(e.to_string()))?;
    let mut buf = daten.to_vec();
    cipher.apply_keystream(&mut buf);
    Ok(buf)
}

fn schluessel_laenge_pruefen(schluessel: &[u8], suite: &CipherSuite) -> KryptoResult<()> {
    let erwartet = suite.cipher.schluessel_laenge();
    if schluessel.len() != erwartet {
        return Err(KryptoFehler::UngueltigeSchluesselLaenge {
            erwartet,
            erhalten: schluessel.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
