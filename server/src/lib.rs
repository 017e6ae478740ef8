//! kassette-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen
//! Einstiegspunkt fuer Integrationstests bereit.

pub mod api;
pub mod config;
pub mod dienst;

use std::sync::Arc;

use anyhow::{Context, Result};

use kassette_catalog::Katalog;
use kassette_crypto::DomainParameters;
use kassette_license::InMemoryLizenzStore;
use kassette_session::SessionStore;

use api::{routes::api_router, AppState};
use config::ServerConfig;
use dienst::MedienDienst;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Domain-Parameter laden (Datei oder eingebaute Gruppe)
    /// 2. Medienkatalog laden
    /// 3. Session-Store mit Bereinigungs-Task starten
    /// 4. HTTP-API starten und auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let params = Arc::new(
            DomainParameters::laden(self.config.parameter.datei.as_deref())
                .context("Domain-Parameter nicht ladbar")?,
        );

        let katalog = Arc::new(
            Katalog::laden(
                std::path::Path::new(&self.config.katalog.verzeichnis),
                std::path::Path::new(&self.config.katalog.index_datei),
            )
            .await
            .context("Medienkatalog nicht ladbar")?,
        );

        let sessions = SessionStore::neu_mit_cleanup(
            SessionStore::neu(
                Arc::clone(&params),
                self.config.sitzungen.leerlauf_timeout_secs.max(0) as u64,
            ),
            self.config.sitzungen.cleanup_intervall_secs,
        );
        let lizenzen = Arc::new(InMemoryLizenzStore::neu());

        let dienst = Arc::new(MedienDienst::neu(params, sessions, lizenzen, katalog));
        let state = AppState::neu(dienst);
        let router = api_router().with_state(state);

        let listener = tokio::net::TcpListener::bind(self.config.api_bind_adresse())
            .await
            .with_context(|| {
                format!("Bind auf '{}' fehlgeschlagen", self.config.api_bind_adresse())
            })?;
        tracing::info!(adresse = %self.config.api_bind_adresse(), "HTTP-API bereit");

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            })
            .await?;

        Ok(())
    }
}
