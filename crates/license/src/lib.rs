//! kassette-license – Lizenz-Store (Entitlement-Verwaltung)
//!
//! Der Kern konsumiert diesen Store als externen Kollaborateur: pro
//! erfolgreich ausgeliefertem Chunk wird Abspieldauer vom Guthaben
//! des Principals abgebucht. Das Crate stellt den Trait-Seam
//! `LizenzStore` plus eine In-Memory-Implementierung mit
//! Argon2id-Passwort-Hashes bereit.

pub mod error;
pub mod password;
pub mod store;

// Bequeme Re-Exporte
pub use error::{LizenzFehler, LizenzResult};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use store::{InMemoryLizenzStore, LizenzStore};
