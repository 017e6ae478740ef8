//! Fehlertypen fuer das Kryptografie-Fundament

use thiserror::Error;

/// Fehler im Kryptografie-Fundament
#[derive(Debug, Error)]
pub enum KryptoFehler {
    #[error("Peer-Key gehoert nicht zur konfigurierten Gruppe: {0}")]
    UngueltigerPeerKey(String),

    #[error("Schluessel-Generierung fehlgeschlagen: {0}")]
    SchluesselGenerierung(String),

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Entschluesselung fehlgeschlagen: {0}")]
    Entschluesselung(String),

    #[error("Key Derivation fehlgeschlagen: {0}")]
    KeyDerivation(String),

    #[error("Ungueltige Schluessel-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erwartet: usize, erhalten: usize },

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type KryptoResult<T> = Result<T, KryptoFehler>;
