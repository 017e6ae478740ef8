//! Fehlertypen fuer den Lizenz-Store

use thiserror::Error;

/// Alle moeglichen Fehler der Entitlement-Verwaltung
#[derive(Debug, Error)]
pub enum LizenzFehler {
    #[error("Keine Lizenz fuer Principal: {0}")]
    LizenzNichtGefunden(String),

    #[error("Lizenz existiert bereits: {0}")]
    LizenzBereitsVorhanden(String),

    #[error("Guthaben erschoepft: {rest}s uebrig, {benoetigt}s benoetigt")]
    GuthabenErschoepft { rest: u64, benoetigt: u64 },

    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),
}

pub type LizenzResult<T> = Result<T, LizenzFehler>;
