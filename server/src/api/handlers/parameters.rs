//! Unauthentifizierte Handshake-Endpunkte: Parameter und Protokolle

use axum::{extract::State, response::Json};

use kassette_crypto::{ParameterVeroeffentlichung, ProtokollAngebot};

use crate::api::AppState;

/// GET /api/parameters: oeffentliche DH-Gruppe (Primzahl + Generator)
pub async fn get_parameters(State(state): State<AppState>) -> Json<ParameterVeroeffentlichung> {
    Json(state.dienst.parameter())
}

/// GET /api/protocols: statische Cipher-Suite-Registry
pub async fn get_protocols(State(state): State<AppState>) -> Json<ProtokollAngebot> {
    Json(state.dienst.protokolle())
}
