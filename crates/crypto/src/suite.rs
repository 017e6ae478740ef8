//! Verhandelbare Cipher-Suiten
//!
//! Der Client waehlt bei der Registrierung genau eine Kombination aus
//! Cipher, Digest und Betriebsmodus; sie bleibt fuer die gesamte
//! Session-Lebensdauer fest. Die Registry ist die statische
//! Aufzaehlung aller angebotenen Optionen.

use serde::{Deserialize, Serialize};

/// Symmetrischer Cipher-Algorithmus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cipher {
    #[serde(rename = "AES")]
    Aes,
    #[serde(rename = "3DES")]
    TripleDes,
}

impl Cipher {
    /// Schluessel-Laenge in Bytes (AES-256 bzw. 3-Key-Triple-DES)
    pub fn schluessel_laenge(&self) -> usize {
        match self {
            Cipher::Aes => 32,
            Cipher::TripleDes => 24,
        }
    }

    /// Block- und damit IV-Laenge in Bytes
    pub fn iv_laenge(&self) -> usize {
        match self {
            Cipher::Aes => 16,
            Cipher::TripleDes => 8,
        }
    }
}

/// Digest-Algorithmus fuer die MIC-Berechnung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigestAlgorithmus {
    #[serde(rename = "SHA512")]
    Sha512,
    #[serde(rename = "BLAKE2")]
    Blake2,
}

/// Betriebsmodus des Ciphers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherModus {
    #[serde(rename = "CBC")]
    Cbc,
    #[serde(rename = "OFB")]
    Ofb,
}

/// Die pro Session verhandelte Kombination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherSuite {
    pub cipher: Cipher,
    pub digest: DigestAlgorithmus,
    #[serde(rename = "cipher_mode")]
    pub modus: CipherModus,
}

impl CipherSuite {
    pub fn neu(cipher: Cipher, digest: DigestAlgorithmus, modus: CipherModus) -> Self {
        Self { cipher, digest, modus }
    }

    /// Alle angebotenen Kombinationen (fuer Tests und Dokumentation)
    pub fn alle() -> Vec<CipherSuite> {
        let mut suiten = Vec::new();
        for cipher in [Cipher::Aes, Cipher::TripleDes] {
            for digest in [DigestAlgorithmus::Sha512, DigestAlgorithmus::Blake2] {
                for modus in [CipherModus::Cbc, CipherModus::Ofb] {
                    suiten.push(CipherSuite::neu(cipher, digest, modus));
                }
            }
        }
        suiten
    }
}

/// Antwortform des unauthentifizierten Protokoll-Endpunkts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtokollAngebot {
    pub cipher: Vec<String>,
    pub digests: Vec<String>,
    pub cipher_mode: Vec<String>,
}

/// Die statische Cipher-Suite-Registry
pub fn angebot() -> ProtokollAngebot {
    ProtokollAngebot {
        cipher: vec!["AES".to_string(), "3DES".to_string()],
        digests: vec!["SHA512".to_string(), "BLAKE2".to_string()],
        cipher_mode: vec!["CBC".to_string(), "OFB".to_string()],
    }
}
