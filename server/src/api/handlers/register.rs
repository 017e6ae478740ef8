//! Registrierungs-Endpunkt: Schluesselaustausch und Session-Anlage

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;

use kassette_crypto::CipherSuite;

use crate::api::{AppState, HEADER_SESSION};

/// Anfrage-Body der Registrierung
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    /// Oeffentlicher Client-Schluessel, big-endian, Base64
    pub public_key: String,
    /// Gewaehlte Cipher-Suite (Wire-Namen, z.B. "AES"/"SHA512"/"CBC")
    #[serde(flatten)]
    pub suite: CipherSuite,
}

/// Antwort-Body der Registrierung; die Session-ID geht als
/// `x-session-id`-Header raus
#[derive(Debug, Serialize)]
pub struct RegisterAntwort {
    /// Oeffentlicher Server-Schluessel, big-endian, Base64
    pub public_key: String,
}

/// POST /api/register
pub async fn post_register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Response {
    let public_key = match BASE64.decode(&body.public_key) {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "public_key nicht base64-kodiert" })),
            )
                .into_response();
        }
    };

    match state.dienst.registrieren(&public_key, body.suite) {
        Ok(registrierung) => (
            StatusCode::OK,
            [(HEADER_SESSION, registrierung.session_id.to_string())],
            Json(RegisterAntwort {
                public_key: BASE64.encode(&registrierung.server_public_key),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::info!(fehler = %e, "Registrierung abgewiesen");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
