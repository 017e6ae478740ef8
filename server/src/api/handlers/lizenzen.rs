//! Lizenz-Provisionierung

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use kassette_license::LizenzFehler;

use crate::api::AppState;
use crate::dienst::DienstFehler;

#[derive(Debug, Deserialize)]
pub struct LicenseBody {
    pub username: String,
    pub password: String,
    /// Startguthaben in Sekunden Abspieldauer
    pub guthaben_secs: u64,
}

/// POST /api/licenses: neue Lizenz mit Startguthaben anlegen
pub async fn post_license(
    State(state): State<AppState>,
    Json(body): Json<LicenseBody>,
) -> Response {
    match state
        .dienst
        .lizenz_anlegen(&body.username, &body.password, body.guthaben_secs)
        .await
    {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(DienstFehler::Lizenz(LizenzFehler::LizenzBereitsVorhanden(_))) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Lizenz existiert bereits" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Lizenz-Anlage fehlgeschlagen");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
