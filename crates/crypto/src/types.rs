//! Gemeinsame Typen fuer das Kryptografie-Fundament

use num_bigint_dig::BigUint;

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBytes(Vec<u8>);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ein ephemeres DH-Schluesselpaar ueber der geladenen Gruppe
///
/// Der private Exponent verlaesst den Server nie; der oeffentliche
/// Teil wird big-endian serialisiert an den Client geschickt.
#[derive(Clone)]
pub struct DhSchluesselPaar {
    pub(crate) privat: BigUint,
    pub oeffentlich: BigUint,
}

impl DhSchluesselPaar {
    /// Oeffentlicher Schluessel als big-endian Bytes
    pub fn oeffentlich_bytes(&self) -> Vec<u8> {
        self.oeffentlich.to_bytes_be()
    }
}

impl std::fmt::Debug for DhSchluesselPaar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhSchluesselPaar")
            .field("privat", &"[REDACTED]")
            .field("oeffentlich", &self.oeffentlich)
            .finish()
    }
}
