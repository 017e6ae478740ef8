//! Secure Channel: versiegelte Envelopes
//!
//! Jeder geschuetzte Austausch laeuft als `SecureEnvelope` ueber die
//! Leitung: Ciphertext plus MIC ueber den Ciphertext (nie ueber den
//! Klartext). Der Empfaenger rechnet den MIC nach und vergleicht in
//! konstanter Zeit, BEVOR er entschluesselt; bei Abweichung wird die
//! Anfrage verworfen ohne jeden Entschluesselungsversuch.
//!
//! Chunk-Antworten werden mit `kontext = chunk_index` versiegelt:
//! der effektive Schluessel entsteht per HKDF aus Shared Secret und
//! Index, sodass Ciphertext fuer den falschen Index nicht aufgeht.

use kassette_crypto::{cipher, digest, kdf};

use crate::error::{SessionFehler, SessionResult};
use crate::session::Session;

/// Die Wire-Einheit jedes geschuetzten Austauschs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureEnvelope {
    /// `iv || ciphertext` unter der Suite der Session
    pub ciphertext: Vec<u8>,
    /// Digest ueber `ciphertext` mit dem verhandelten Algorithmus
    pub mic: Vec<u8>,
}

impl SecureEnvelope {
    /// MIC als Hex-String fuer den Transport-Header
    pub fn mic_hex(&self) -> String {
        hex::encode(&self.mic)
    }
}

/// Kontext-Suffix fuer die Schluesseltrennung pro Chunk
pub fn kontext_fuer_chunk(chunk_index: u64) -> [u8; 8] {
    chunk_index.to_be_bytes()
}

/// Versiegelt Klartext fuer eine Session
///
/// Mit `kontext` wird der effektive Schluessel suffix-gebunden
/// abgeleitet (Chunk-Trennung); ohne Kontext gilt das Shared Secret
/// allein als Ableitungswurzel. Keine Seiteneffekte.
pub fn versiegeln(
    session: &Session,
    klartext: &[u8],
    kontext: Option<&[u8]>,
) -> SessionResult<SecureEnvelope> {
    let schluessel = kdf::anfrage_schluessel(session.shared_secret(), &session.suite, kontext)?;
    let ciphertext = cipher::verschluesseln(schluessel.as_bytes(), &session.suite, klartext)?;
    let mic = digest::mic_berechnen(&ciphertext, session.suite.digest);
    Ok(SecureEnvelope { ciphertext, mic })
}

/// Oeffnet einen Envelope fuer eine Session
///
/// Faellt geschlossen aus: bei MIC-Abweichung wird mit
/// `Integritaetsfehler` abgebrochen, ohne Entschluesselungsversuch
/// (kein Orakel).
pub fn oeffnen(
    session: &Session,
    envelope: &SecureEnvelope,
    kontext: Option<&[u8]>,
) -> SessionResult<Vec<u8>> {
    if !digest::mic_pruefen(&envelope.ciphertext, session.suite.digest, &envelope.mic) {
        return Err(SessionFehler::Integritaetsfehler);
    }

    let schluessel = kdf::anfrage_schluessel(session.shared_secret(), &session.suite, kontext)?;
    cipher::entschluesseln(schluessel.as_bytes(), &session.suite, &envelope.ciphertext)
        .map_err(SessionFehler::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
