//! Fehlertypen fuer Session-Verwaltung und Secure Channel

use thiserror::Error;

/// Alle moeglichen Fehler rund um Sessions
#[derive(Debug, Error)]
pub enum SessionFehler {
    /// Unbekannte oder abgelaufene Session-ID. Bewusst nicht weiter
    /// aufgeschluesselt, damit ein Angreifer nicht erkennen kann ob
    /// die ID jemals existiert hat.
    #[error("Session nicht gefunden")]
    SessionNichtGefunden,

    #[error("Session ist nicht authentifiziert")]
    NichtAutorisiert,

    #[error("Session ist bereits an einen anderen Principal gebunden")]
    PrincipalKonflikt,

    /// MIC-Pruefung fehlgeschlagen. Es wurde nicht entschluesselt.
    #[error("MIC stimmt nicht ueberein")]
    Integritaetsfehler,

    #[error("Kryptografie-Fehler: {0}")]
    Krypto(#[from] kassette_crypto::KryptoFehler),
}

pub type SessionResult<T> = Result<T, SessionFehler>;
