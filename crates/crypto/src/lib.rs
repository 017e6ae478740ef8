//! # kassette-crypto
//!
//! Kryptografie-Fundament fuer den Kassette Medien-Server.
//!
//! ## Module
//! - `params` - DH-Domaenenparameter (Primzahl + Generator, Publikation)
//! - `dh`     - Ephemere Schluesselpaare und Diffie-Hellman-Austausch
//! - `suite`  - Verhandelbare Cipher-Suiten (Cipher, Digest, Modus)
//! - `cipher` - Symmetrische Ver-/Entschluesselung (CBC, OFB)
//! - `digest` - MIC-Berechnung (SHA-512, BLAKE2b-512)
//! - `kdf`    - HKDF-Schluesselableitung pro Anfrage
//! - `types`  - Gemeinsame Typen (SecretBytes, DhSchluesselPaar)
//! - `error`  - Fehlertypen

pub mod cipher;
pub mod dh;
pub mod digest;
pub mod error;
pub mod kdf;
pub mod params;
pub mod suite;
pub mod types;

// Bequeme Re-Exporte
pub use error::{KryptoFehler, KryptoResult};
pub use params::{DomainParameters, ParameterVeroeffentlichung};
pub use suite::{angebot, Cipher, CipherModus, CipherSuite, DigestAlgorithmus, ProtokollAngebot};
pub use types::{DhSchluesselPaar, SecretBytes};

pub use dh::{austausch, schluesselpaar_erzeugen};
pub use digest::{mic_berechnen, mic_pruefen};
pub use kdf::anfrage_schluessel;
