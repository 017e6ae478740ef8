//! Der Lizenz-Store: Trait-Seam plus In-Memory-Implementierung
//!
//! `verbrauchen` prueft und bucht unter einem einzigen Write-Lock ab,
//! damit parallele Downloads keine Updates verlieren oder doppeln.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::{LizenzFehler, LizenzResult};
use crate::password::{passwort_hashen, passwort_verifizieren};

/// Schnittstelle des Entitlement-Trackers aus Sicht des Kerns
///
/// Aufrufe gelten als potenziell langsame externe Calls; der Kern
/// wiederholt sie nie automatisch.
pub trait LizenzStore: Send + Sync {
    /// Prueft Anmeldedaten; unbekannte Principals ergeben `false`,
    /// nicht einen unterscheidbaren Fehler
    fn pruefe_anmeldedaten(
        &self,
        principal: &str,
        passwort: &str,
    ) -> impl std::future::Future<Output = LizenzResult<bool>> + Send;

    /// Bucht Abspieldauer ab; gibt das Restguthaben zurueck
    fn verbrauchen(
        &self,
        principal: &str,
        dauer_secs: u64,
    ) -> impl std::future::Future<Output = LizenzResult<u64>> + Send;

    /// Legt eine neue Lizenz mit Startguthaben an
    fn anlegen(
        &self,
        principal: &str,
        passwort: &str,
        guthaben_secs: u64,
    ) -> impl std::future::Future<Output = LizenzResult<()>> + Send;

    /// Aktuelles Restguthaben eines Principals
    fn guthaben(
        &self,
        principal: &str,
    ) -> impl std::future::Future<Output = LizenzResult<u64>> + Send;
}

#[derive(Debug, Clone)]
struct Lizenz {
    passwort_hash: String,
    guthaben_secs: u64,
}

/// In-Memory-Implementierung des Lizenz-Stores
#[derive(Default)]
pub struct InMemoryLizenzStore {
    lizenzen: RwLock<HashMap<String, Lizenz>>,
}

impl InMemoryLizenzStore {
    pub fn neu() -> Self {
        Self::default()
    }
}

impl LizenzStore for InMemoryLizenzStore {
    async fn pruefe_anmeldedaten(&self, principal: &str, passwort: &str) -> LizenzResult<bool> {
        let lizenzen = self.lizenzen.read().await;
        match lizenzen.get(principal) {
            Some(lizenz) => passwort_verifizieren(passwort, &lizenz.passwort_hash),
            None => Ok(false),
        }
    }

    async fn verbrauchen(&self, principal: &str, dauer_secs: u64) -> LizenzResult<u64> {
        let mut lizenzen = self.lizenzen.write().await;
        let lizenz = lizenzen
            .get_mut(principal)
            .ok_or_else(|| LizenzFehler::LizenzNichtGefunden(principal.to_string()))?;

        if lizenz.guthaben_secs < dauer_secs {
            return Err(LizenzFehler::GuthabenErschoepft {
                rest: lizenz.guthaben_secs,
                benoetigt: dauer_secs,
            });
        }

        lizenz.guthaben_secs -= dauer_secs;
        tracing::debug!(
            principal = %principal,
            abgebucht = dauer_secs,
            rest = lizenz.guthaben_secs,
            "Abspieldauer abgebucht"
        );
        Ok(lizenz.guthaben_secs)
    }

    async fn anlegen(
        &self,
        principal: &str,
        passwort: &str,
        guthaben_secs: u64,
    ) -> LizenzResult<()> {
        let mut lizenzen = self.lizenzen.write().await;
        if lizenzen.contains_key(principal) {
            return Err(LizenzFehler::LizenzBereitsVorhanden(principal.to_string()));
        }

        let passwort_hash = passwort_hashen(passwort)?;
        lizenzen.insert(
            principal.to_string(),
            Lizenz { passwort_hash, guthaben_secs },
        );
        tracing::info!(principal = %principal, guthaben = guthaben_secs, "Neue Lizenz angelegt");
        Ok(())
    }

    async fn guthaben(&self, principal: &str) -> LizenzResult<u64> {
        let lizenzen = self.lizenzen.read().await;
        lizenzen
            .get(principal)
            .map(|l| l.guthaben_secs)
            .ok_or_else(|| LizenzFehler::LizenzNichtGefunden(principal.to_string()))
    }
}
