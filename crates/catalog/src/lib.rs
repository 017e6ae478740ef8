//! kassette-catalog – Medienkatalog und Chunk-Zugriff
//!
//! Haelt den Index der auslieferbaren Medien und liest Mediendateien
//! Chunk-weise von der Platte, ohne sie komplett in den Speicher zu
//! laden.

pub mod error;
pub mod katalog;

// Bequeme Re-Exporte
pub use error::{KatalogFehler, KatalogResult};
pub use katalog::{Katalog, KatalogUebersicht, MediaEintrag, CHUNK_GROESSE};
