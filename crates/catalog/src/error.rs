//! Fehlertypen des Medienkatalogs

use thiserror::Error;

/// Alle moeglichen Katalog-Fehler
#[derive(Debug, Error)]
pub enum KatalogFehler {
    #[error("Medium nicht gefunden: {0}")]
    MedienNichtGefunden(String),

    #[error("Ungueltiger Chunk-Index {index} fuer Medium {medium} ({anzahl} Chunks)")]
    UngueltigerChunk {
        medium: String,
        index: u64,
        anzahl: u64,
    },

    #[error("Katalog-Index konnte nicht gelesen werden: {0}")]
    IndexFormat(#[from] toml::de::Error),

    #[error("Datei-IO fehlgeschlagen: {0}")]
    Io(#[from] std::io::Error),
}

pub type KatalogResult<T> = Result<T, KatalogFehler>;
