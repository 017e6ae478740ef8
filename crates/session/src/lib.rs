//! kassette-session – Session-Verwaltung und Secure Channel
//!
//! Dieses Crate implementiert:
//! - Die Session-Entitaet mit dem Zustandsautomaten
//!   REGISTRIERT -> AUTHENTIFIZIERT
//! - Den nebenlaeufigen Session-Store (erstellen, abrufen,
//!   authentifizieren, entfernen, Leerlauf-Bereinigung)
//! - Den Secure Channel: versiegelte Envelopes (Ciphertext + MIC)
//!   fuer jeden geschuetzten Austausch

pub mod channel;
pub mod error;
pub mod session;
pub mod store;

// Bequeme Re-Exporte
pub use channel::{kontext_fuer_chunk, oeffnen, versiegeln, SecureEnvelope};
pub use error::{SessionFehler, SessionResult};
pub use session::{Session, SessionZustand};
pub use store::{Registrierung, SessionStore};
