//! Nebenlaeufiger Session-Store
//!
//! Der Store ist die einzige gemeinsam beschriebene Struktur des
//! Kerns. Er haelt die Sessions in einer `DashMap`, sodass
//! erstellen/abrufen/authentifizieren/entfernen pro Session-ID
//! atomar zueinander sind; Lesezugriffe geben Klone heraus, damit
//! eine parallele Entfernung nie einen halb geleerten Datensatz
//! sichtbar macht. Ein Hintergrund-Task bereinigt Leerlauf-Sessions,
//! zusaetzlich prueft jeder Zugriff das Limit selbst.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use kassette_crypto::{dh, CipherSuite, DomainParameters};

use crate::error::{SessionFehler, SessionResult};
use crate::session::{Session, SessionZustand};

/// Ergebnis einer erfolgreichen Registrierung
#[derive(Debug, Clone)]
pub struct Registrierung {
    pub session_id: Uuid,
    /// Big-endian serialisierter oeffentlicher Server-Schluessel
    pub server_public_key: Vec<u8>,
}

/// Der Session-Store
pub struct SessionStore {
    params: Arc<DomainParameters>,
    sessions: DashMap<Uuid, Session>,
    leerlauf_timeout: Duration,
}

impl SessionStore {
    /// Erstellt einen leeren Store ueber der geladenen DH-Gruppe
    pub fn neu(params: Arc<DomainParameters>, leerlauf_timeout_secs: u64) -> Arc<Self> {
        Arc::new(Self {
            params,
            sessions: DashMap::new(),
            leerlauf_timeout: Duration::seconds(leerlauf_timeout_secs as i64),
        })
    }

    /// Startet den periodischen Bereinigungs-Task fuer den Store
    pub fn neu_mit_cleanup(store: Arc<Self>, intervall_secs: u64) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            let mut intervall =
                tokio::time::interval(StdDuration::from_secs(intervall_secs.max(1)));
            loop {
                intervall.tick().await;
                let entfernt = store_klon.cleanup_abgelaufene();
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Leerlauf-Sessions bereinigt");
                }
            }
        });
        store
    }

    /// Registriert einen Client: frisches Schluesselpaar, DH-Austausch,
    /// neue Session im Zustand REGISTRIERT
    ///
    /// Schlaegt mit `UngueltigerPeerKey` fehl wenn der gelieferte
    /// Schluessel kein Element der Gruppe ist.
    pub fn erstellen(
        &self,
        client_public_key: &[u8],
        suite: CipherSuite,
    ) -> SessionResult<Registrierung> {
        let peer = dh::peer_schluessel_dekodieren(client_public_key)?;

        let paar = dh::schluesselpaar_erzeugen(&self.params);
        let shared_secret = dh::austausch(&self.params, &paar, &peer)?;
        let server_public_key = paar.oeffentlich_bytes();

        // UUIDv4-Kollisionen sind praktisch ausgeschlossen; die
        // Schleife garantiert die Eindeutigkeit trotzdem.
        let session_id = loop {
            let id = Uuid::new_v4();
            match self.sessions.entry(id) {
                Entry::Vacant(eintrag) => {
                    eintrag.insert(Session::neu(
                        id,
                        suite,
                        client_public_key.to_vec(),
                        server_public_key.clone(),
                        shared_secret.clone(),
                    ));
                    break id;
                }
                Entry::Occupied(_) => continue,
            }
        };

        tracing::debug!(session_id = %session_id, "Session registriert");
        Ok(Registrierung { session_id, server_public_key })
    }

    /// Ruft eine Session ab (Klon) und frischt die Aktivitaet auf
    ///
    /// Abgelaufene Sessions werden dabei entfernt und wie unbekannte
    /// IDs behandelt.
    pub fn abrufen(&self, session_id: Uuid) -> SessionResult<Session> {
        {
            let mut eintrag = self
                .sessions
                .get_mut(&session_id)
                .ok_or(SessionFehler::SessionNichtGefunden)?;
            if !eintrag.ist_abgelaufen(self.leerlauf_timeout) {
                eintrag.letzte_aktivitaet = Utc::now();
                return Ok(eintrag.clone());
            }
        }
        // Leerlauf-Limit ueberschritten: lazy entfernen
        self.sessions.remove(&session_id);
        tracing::debug!(session_id = %session_id, "Abgelaufene Session beim Zugriff entfernt");
        Err(SessionFehler::SessionNichtGefunden)
    }

    /// Bindet den Principal und schaltet auf AUTHENTIFIZIERT
    ///
    /// Der Aufrufer hat die Anmeldedaten bereits geprueft; ein
    /// fehlgeschlagener Versuch erreicht diese Methode nie, der
    /// Zustand bleibt dann unveraendert. Erneutes Authentifizieren
    /// mit demselben Principal ist ein No-op.
    pub fn authentifizieren(&self, session_id: Uuid, principal: &str) -> SessionResult<()> {
        let mut eintrag = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionFehler::SessionNichtGefunden)?;

        match eintrag.zustand {
            SessionZustand::Registriert => {
                eintrag.zustand = SessionZustand::Authentifiziert;
                eintrag.principal = Some(principal.to_string());
                eintrag.letzte_aktivitaet = Utc::now();
                tracing::info!(session_id = %session_id, principal = %principal, "Session authentifiziert");
                Ok(())
            }
            SessionZustand::Authentifiziert => {
                if eintrag.principal.as_deref() == Some(principal) {
                    Ok(())
                } else {
                    Err(SessionFehler::PrincipalKonflikt)
                }
            }
        }
    }

    /// Entfernt eine Session (Logout)
    pub fn entfernen(&self, session_id: Uuid) -> bool {
        let entfernt = self.sessions.remove(&session_id).is_some();
        if entfernt {
            tracing::debug!(session_id = %session_id, "Session entfernt");
        }
        entfernt
    }

    /// Bereinigt Leerlauf-Sessions; gibt die Anzahl zurueck
    ///
    /// Zaehlt direkt im `retain`-Praedikat; ein Laengen-Vergleich
    /// vorher/nachher wuerde bei parallelen Registrierungen
    /// unterlaufen.
    pub fn cleanup_abgelaufene(&self) -> usize {
        let timeout = self.leerlauf_timeout;
        let mut entfernt = 0usize;
        self.sessions.retain(|_, s| {
            if s.ist_abgelaufen(timeout) {
                entfernt += 1;
                false
            } else {
                true
            }
        });
        entfernt
    }

    /// Anzahl der aktuell gehaltenen Sessions
    pub fn anzahl(&self) -> usize {
        self.sessions.len()
    }
}
