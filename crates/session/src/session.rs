//! Die Session-Entitaet
//!
//! Eine Session entsteht bei der Registrierung (Client liefert
//! Public Key + Suite), haelt das einmal abgeleitete Shared Secret
//! und wandert hoechstens einmal von REGISTRIERT nach
//! AUTHENTIFIZIERT. Der private Teil des ephemeren
//! Server-Schluesselpaars wird direkt nach der Ableitung verworfen.

use chrono::{DateTime, Duration, Utc};
use kassette_crypto::{CipherSuite, SecretBytes};
use uuid::Uuid;

/// Zustand einer Session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionZustand {
    Registriert,
    Authentifiziert,
}

/// Eine live Session eines Clients
#[derive(Debug, Clone)]
pub struct Session {
    /// Opake 128-Bit-Kennung, serverseitig vergeben
    pub id: Uuid,
    /// Die bei der Registrierung verhandelte Suite
    pub suite: CipherSuite,
    /// Zustandsautomat (hoechstens ein Uebergang)
    pub zustand: SessionZustand,
    /// Gebundene Identitaet, erst nach Authentifizierung gesetzt
    pub principal: Option<String>,
    /// Client-Public-Key, nur noch fuer Audit-Zwecke aufbewahrt
    pub client_public_key: Vec<u8>,
    /// Server-Public-Key der Registrierungsantwort (Audit)
    pub server_public_key: Vec<u8>,
    /// Zeitpunkt der Erstellung
    pub erstellt_am: DateTime<Utc>,
    /// Letzte Aktivitaet (fuer die Leerlauf-Bereinigung)
    pub letzte_aktivitaet: DateTime<Utc>,
    // Genau einmal bei der Erstellung gesetzt, nie neu berechnet
    shared_secret: SecretBytes,
}

impl Session {
    /// Erstellt eine frische Session im Zustand REGISTRIERT
    pub fn neu(
        id: Uuid,
        suite: CipherSuite,
        client_public_key: Vec<u8>,
        server_public_key: Vec<u8>,
        shared_secret: SecretBytes,
    ) -> Self {
        let jetzt = Utc::now();
        Self {
            id,
            suite,
            zustand: SessionZustand::Registriert,
            principal: None,
            client_public_key,
            server_public_key,
            erstellt_am: jetzt,
            letzte_aktivitaet: jetzt,
            shared_secret,
        }
    }

    /// Das Shared Secret – einzige Schluesselableitungs-Wurzel
    pub fn shared_secret(&self) -> &[u8] {
        self.shared_secret.as_bytes()
    }

    pub fn ist_authentifiziert(&self) -> bool {
        self.zustand == SessionZustand::Authentifiziert
    }

    /// Prueft ob die Session das Leerlauf-Limit ueberschritten hat
    pub fn ist_abgelaufen(&self, leerlauf_timeout: Duration) -> bool {
        Utc::now() - self.letzte_aktivitaet > leerlauf_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassette_crypto::{Cipher, CipherModus, DigestAlgorithmus};

    fn test_session() -> Session {
        Session::neu(
            Uuid::new_v4(),
            CipherSuite::neu(Cipher::Aes, DigestAlgorithmus::Sha512, CipherModus::Cbc),
            vec![1, 2, 3],
            vec![4, 5, 6],
            SecretBytes::new(vec![7; 32]),
        )
    }

    #[test]
    fn frische_session_ist_registriert() {
        let session = test_session();
        assert_eq!(session.zustand, SessionZustand::Registriert);
        assert!(!session.ist_authentifiziert());
        assert!(session.principal.is_none());
    }

    #[test]
    fn frische_session_nicht_abgelaufen() {
        let session = test_session();
        assert!(!session.ist_abgelaufen(Duration::seconds(900)));
        assert!(session.ist_abgelaufen(Duration::seconds(-1)));
    }

    #[test]
    fn debug_verraet_kein_secret() {
        let session = test_session();
        let ausgabe = format!("{session:?}");
        assert!(ausgabe.contains("REDACTED"));
    }
}
