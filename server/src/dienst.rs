//! Der Medien-Dienst: Kernlogik hinter der HTTP-API
//!
//! Buendelt Session-Store, Lizenz-Store und Katalog und setzt die
//! Ablaufregeln durch: registrieren, authentifizieren, Katalog listen,
//! Chunks versiegelt ausliefern, abmelden. Die HTTP-Schicht uebersetzt
//! nur noch zwischen Envelopes und Transport.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use kassette_catalog::{Katalog, KatalogFehler, KatalogUebersicht};
use kassette_crypto::{
    CipherSuite, DomainParameters, KryptoFehler, ParameterVeroeffentlichung, ProtokollAngebot,
};
use kassette_license::{LizenzFehler, LizenzStore};
use kassette_session::{
    kontext_fuer_chunk, oeffnen, versiegeln, Registrierung, SecureEnvelope, Session,
    SessionFehler, SessionStore,
};

/// Fehler des Medien-Dienstes
#[derive(Debug, Error)]
pub enum DienstFehler {
    #[error("Nicht autorisiert")]
    NichtAutorisiert,

    #[error("Anmeldedaten ungueltig")]
    AnmeldedatenUngueltig,

    #[error("Anfrage nicht lesbar: {0}")]
    AnfrageFormat(String),

    #[error(transparent)]
    Session(#[from] SessionFehler),

    #[error(transparent)]
    Lizenz(#[from] LizenzFehler),

    #[error(transparent)]
    Katalog(#[from] KatalogFehler),

    #[error(transparent)]
    Krypto(#[from] KryptoFehler),
}

pub type DienstResult<T> = Result<T, DienstFehler>;

/// Anmeldedaten, wie sie der Client versiegelt einreicht
#[derive(Debug, Serialize, Deserialize)]
pub struct AnmeldeDaten {
    pub username: String,
    pub password: String,
}

/// Versiegelte Status-Antwort
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusAntwort {
    pub status: String,
}

/// Versiegelte Fehler-Antwort
#[derive(Debug, Serialize, Deserialize)]
pub struct FehlerAntwort {
    pub error: String,
}

/// Der Medien-Dienst
pub struct MedienDienst<L: LizenzStore> {
    params: Arc<DomainParameters>,
    sessions: Arc<SessionStore>,
    lizenzen: Arc<L>,
    katalog: Arc<Katalog>,
}

impl<L: LizenzStore> MedienDienst<L> {
    pub fn neu(
        params: Arc<DomainParameters>,
        sessions: Arc<SessionStore>,
        lizenzen: Arc<L>,
        katalog: Arc<Katalog>,
    ) -> Self {
        Self {
            params,
            sessions,
            lizenzen,
            katalog,
        }
    }

    /// Oeffentliche Domain-Parameter fuer den Schluesselaustausch
    pub fn parameter(&self) -> ParameterVeroeffentlichung {
        self.params.veroeffentlichung()
    }

    /// Angebotene Cipher-Suiten
    pub fn protokolle(&self) -> ProtokollAngebot {
        kassette_crypto::angebot()
    }

    /// Registriert einen Client mit seinem oeffentlichen Schluessel
    pub fn registrieren(
        &self,
        client_public_key: &[u8],
        suite: CipherSuite,
    ) -> DienstResult<Registrierung> {
        Ok(self.sessions.erstellen(client_public_key, suite)?)
    }

    /// Authentifiziert eine Session anhand versiegelter Anmeldedaten
    ///
    /// Fehlgeschlagene Versuche lassen Session und Lizenz unveraendert;
    /// die Session bleibt REGISTRIERT und darf es erneut versuchen.
    pub async fn authentifizieren(
        &self,
        session_id: Uuid,
        envelope: &SecureEnvelope,
    ) -> DienstResult<SecureEnvelope> {
        let session = self.sessions.abrufen(session_id)?;

        let klartext = oeffnen(&session, envelope, None)?;
        let anmeldung: AnmeldeDaten = serde_json::from_slice(&klartext)
            .map_err(|e| DienstFehler::AnfrageFormat(e.to_string()))?;

        let gueltig = self
            .lizenzen
            .pruefe_anmeldedaten(&anmeldung.username, &anmeldung.password)
            .await?;
        if !gueltig {
            tracing::info!(session_id = %session_id, "Anmeldung abgewiesen");
            return Err(DienstFehler::AnmeldedatenUngueltig);
        }

        self.sessions.authentifizieren(session_id, &anmeldung.username)?;
        self.status_versiegeln(&session, "ok")
    }

    /// Liefert die versiegelte Katalogliste
    pub fn liste(&self, session_id: Uuid) -> DienstResult<SecureEnvelope> {
        let session = self.authentifizierte_session(session_id)?;
        let uebersicht: Vec<KatalogUebersicht> = self.katalog.uebersicht();
        let json = serde_json::to_vec(&uebersicht)
            .map_err(|e| DienstFehler::AnfrageFormat(e.to_string()))?;
        Ok(versiegeln(&session, &json, None)?)
    }

    /// Liefert einen versiegelten Chunk und bucht Abspieldauer ab
    ///
    /// Reihenfolge: Chunk-Index validieren, Chunk lesen, versiegeln,
    /// dann Guthaben abbuchen. Abgebucht wird nur was auslieferbar
    /// versiegelt wurde; reicht das Guthaben nicht, verlaesst kein
    /// Chunk den Server.
    // TODO: Abbuchung pro Medium und Session deduplizieren, damit ein
    // erneuter Download desselben Chunks nicht doppelt kostet.
    pub async fn download(
        &self,
        session_id: Uuid,
        media_id: &str,
        chunk_index: u64,
    ) -> DienstResult<SecureEnvelope> {
        let session = self.authentifizierte_session(session_id)?;
        // abrufen() garantiert den Principal im Zustand AUTHENTIFIZIERT
        let principal = session
            .principal
            .clone()
            .ok_or(DienstFehler::NichtAutorisiert)?;

        let eintrag = self.katalog.eintrag(media_id)?;
        let dauer_secs = eintrag.dauer_secs;

        let chunk = self.katalog.chunk_lesen(media_id, chunk_index).await?;

        let kontext = kontext_fuer_chunk(chunk_index);
        let envelope = versiegeln(&session, &chunk, Some(&kontext))?;

        let rest = self.lizenzen.verbrauchen(&principal, dauer_secs).await?;
        tracing::debug!(
            session_id = %session_id,
            medium = media_id,
            chunk = chunk_index,
            rest_guthaben = rest,
            "Chunk ausgeliefert"
        );

        Ok(envelope)
    }

    /// Beendet eine Session (Logout)
    pub fn abmelden(&self, session_id: Uuid) -> bool {
        self.sessions.entfernen(session_id)
    }

    /// Legt eine neue Lizenz an (Provisionierung)
    pub async fn lizenz_anlegen(
        &self,
        principal: &str,
        passwort: &str,
        guthaben_secs: u64,
    ) -> DienstResult<()> {
        Ok(self
            .lizenzen
            .anlegen(principal, passwort, guthaben_secs)
            .await?)
    }

    /// Versiegelt eine Fehlermeldung fuer eine bestehende Session
    ///
    /// Sobald ein Shared Secret existiert, gehen auch Fehler nur noch
    /// versiegelt ueber die Leitung.
    pub fn fehler_versiegeln(
        &self,
        session_id: Uuid,
        meldung: &str,
    ) -> DienstResult<SecureEnvelope> {
        let session = self.sessions.abrufen(session_id)?;
        let antwort = FehlerAntwort {
            error: meldung.to_string(),
        };
        let json = serde_json::to_vec(&antwort)
            .map_err(|e| DienstFehler::AnfrageFormat(e.to_string()))?;
        Ok(versiegeln(&session, &json, None)?)
    }

    fn authentifizierte_session(&self, session_id: Uuid) -> DienstResult<Session> {
        let session = self.sessions.abrufen(session_id)?;
        if !session.ist_authentifiziert() {
            return Err(DienstFehler::NichtAutorisiert);
        }
        Ok(session)
    }

    fn status_versiegeln(
        &self,
        session: &Session,
        status: &str,
    ) -> DienstResult<SecureEnvelope> {
        let antwort = StatusAntwort {
            status: status.to_string(),
        };
        let json = serde_json::to_vec(&antwort)
            .map_err(|e| DienstFehler::AnfrageFormat(e.to_string()))?;
        Ok(versiegeln(session, &json, None)?)
    }
}
