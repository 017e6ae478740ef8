//! MIC-Berechnung (Message Integrity Code)
//!
//! Der MIC ist ein Digest ueber den Ciphertext, nie ueber den
//! Klartext. Der Empfaenger berechnet ihn nach und vergleicht in
//! konstanter Zeit, bevor er ueberhaupt entschluesselt.

use blake2::Blake2b512;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::suite::DigestAlgorithmus;

/// Berechnet den MIC ueber die gegebenen Bytes
pub fn mic_berechnen(daten: &[u8], algorithmus: DigestAlgorithmus) -> Vec<u8> {
    match algorithmus {
        DigestAlgorithmus::Sha512 => Sha512::digest(daten).to_vec(),
        DigestAlgorithmus::Blake2 => Blake2b512::digest(daten).to_vec(),
    }
}

/// Prueft einen empfangenen MIC durch Nachrechnen und
/// Konstantzeit-Vergleich (kein Timing-Orakel ueber die Position
/// des ersten abweichenden Bytes)
pub fn mic_pruefen(daten: &[u8], algorithmus: DigestAlgorithmus, erwartet: &[u8]) -> bool {
    mic_berechnen(daten, algorithmus).ct_eq(erwartet).into()
}
