//! HTTP-Interface des Medienservers
//!
//! Envelope-Abbildung auf den Transport: der Body traegt den
//! Base64-kodierten Ciphertext, der Header `x-mic` den Hex-kodierten
//! MIC, der Header `x-session-id` die Session. Sobald eine Session
//! ein Shared Secret hat, gehen auch Fehlermeldungen versiegelt raus.
//! Unbekannte Sessions und MIC-Fehler erhalten dieselbe unversiegelte
//! 401, damit ein Angreifer die Existenz einer Session-ID nicht am
//! Statuscode ablesen kann.

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::json;
use uuid::Uuid;

use kassette_catalog::KatalogFehler;
use kassette_license::{InMemoryLizenzStore, LizenzFehler};
use kassette_session::{SecureEnvelope, SessionFehler};

use crate::dienst::{DienstFehler, MedienDienst};

/// Header fuer die Session-ID
pub const HEADER_SESSION: &str = "x-session-id";
/// Header fuer den MIC eines Envelopes
pub const HEADER_MIC: &str = "x-mic";

/// Axum-State der Medien-API
#[derive(Clone)]
pub struct AppState {
    pub dienst: Arc<MedienDienst<InMemoryLizenzStore>>,
}

impl AppState {
    pub fn neu(dienst: Arc<MedienDienst<InMemoryLizenzStore>>) -> Self {
        Self { dienst }
    }
}

/// Extrahiert die Session-ID aus den Request-Headern
pub fn session_id_aus_headers(headers: &HeaderMap) -> Result<Uuid, Response> {
    let wert = headers
        .get(HEADER_SESSION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unbekannte_session_antwort())?;
    Uuid::parse_str(wert).map_err(|_| unbekannte_session_antwort())
}

/// Baut einen Envelope aus `x-mic`-Header und Base64-Body
pub fn envelope_aus_anfrage(headers: &HeaderMap, body: &str) -> Result<SecureEnvelope, Response> {
    let mic_hex = headers
        .get(HEADER_MIC)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| fehlformat_antwort("MIC-Header fehlt"))?;
    let mic = hex::decode(mic_hex).map_err(|_| fehlformat_antwort("MIC nicht hex-kodiert"))?;
    let ciphertext = BASE64
        .decode(body.trim())
        .map_err(|_| fehlformat_antwort("Body nicht base64-kodiert"))?;
    Ok(SecureEnvelope { ciphertext, mic })
}

/// Serialisiert einen Envelope als Response
pub fn envelope_antwort(status: StatusCode, envelope: &SecureEnvelope) -> Response {
    (
        status,
        [(HEADER_MIC, envelope.mic_hex())],
        BASE64.encode(&envelope.ciphertext),
    )
        .into_response()
}

/// Uebersetzt einen Dienst-Fehler in eine Response
///
/// Existiert die Session noch, wird die Meldung versiegelt; erst wenn
/// auch das scheitert (oder die Session unbekannt ist), geht eine
/// unversiegelte Antwort ohne Details raus.
pub fn dienst_fehler_antwort(
    state: &AppState,
    session_id: Uuid,
    fehler: &DienstFehler,
) -> Response {
    let status = fehler_status(fehler);
    // MIC-Fehler und unbekannte Session teilen dieselbe Antwort:
    // der Statuscode darf die Existenz einer Session nicht verraten
    if matches!(
        fehler,
        DienstFehler::Session(SessionFehler::SessionNichtGefunden)
            | DienstFehler::Session(SessionFehler::Integritaetsfehler)
    ) {
        return unbekannte_session_antwort();
    }
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        // Interne Fehler verlassen den Server ohne Details
        tracing::error!(session_id = %session_id, fehler = %fehler, "Interner Fehler");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match state.dienst.fehler_versiegeln(session_id, &fehler.to_string()) {
        Ok(envelope) => envelope_antwort(status, &envelope),
        Err(e) => {
            tracing::warn!(session_id = %session_id, fehler = %e, "Fehler nicht versiegelbar");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn fehler_status(fehler: &DienstFehler) -> StatusCode {
    match fehler {
        DienstFehler::NichtAutorisiert => StatusCode::UNAUTHORIZED,
        DienstFehler::AnmeldedatenUngueltig => StatusCode::UNAUTHORIZED,
        DienstFehler::AnfrageFormat(_) => StatusCode::BAD_REQUEST,
        DienstFehler::Session(SessionFehler::SessionNichtGefunden) => StatusCode::UNAUTHORIZED,
        DienstFehler::Session(SessionFehler::Integritaetsfehler) => StatusCode::UNAUTHORIZED,
        DienstFehler::Session(_) => StatusCode::BAD_REQUEST,
        DienstFehler::Lizenz(LizenzFehler::GuthabenErschoepft { .. }) => StatusCode::FORBIDDEN,
        DienstFehler::Lizenz(LizenzFehler::LizenzNichtGefunden(_)) => StatusCode::FORBIDDEN,
        DienstFehler::Lizenz(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DienstFehler::Katalog(KatalogFehler::MedienNichtGefunden(_)) => StatusCode::NOT_FOUND,
        DienstFehler::Katalog(KatalogFehler::UngueltigerChunk { .. }) => StatusCode::BAD_REQUEST,
        DienstFehler::Katalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DienstFehler::Krypto(_) => StatusCode::BAD_REQUEST,
    }
}

/// Unversiegelte 401 fuer unbekannte oder abgelaufene Sessions
///
/// Absichtlich ohne Unterscheidung zwischen "nie existiert" und
/// "abgelaufen".
fn unbekannte_session_antwort() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Session unbekannt" })),
    )
        .into_response()
}

fn fehlformat_antwort(meldung: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": meldung })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassette_catalog::Katalog;
    use kassette_crypto::{
        schluesselpaar_erzeugen, Cipher, CipherModus, CipherSuite, DigestAlgorithmus,
        DomainParameters,
    };
    use kassette_session::SessionStore;

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("katalog.toml");
        std::fs::write(&index, "").unwrap();

        let params = Arc::new(DomainParameters::standard());
        let sessions = SessionStore::neu(Arc::clone(&params), 900);
        let lizenzen = Arc::new(InMemoryLizenzStore::neu());
        let katalog = Arc::new(Katalog::laden(dir.path(), &index).await.unwrap());

        let dienst = Arc::new(MedienDienst::neu(params, sessions, lizenzen, katalog));
        (AppState::neu(dienst), dir)
    }

    #[tokio::test]
    async fn mic_fehler_und_unbekannte_session_antworten_identisch() {
        let (state, _dir) = test_state().await;

        let params = DomainParameters::standard();
        let paar = schluesselpaar_erzeugen(&params);
        let suite = CipherSuite::neu(Cipher::Aes, DigestAlgorithmus::Sha512, CipherModus::Cbc);
        let registrierung = state
            .dienst
            .registrieren(&paar.oeffentlich_bytes(), suite)
            .unwrap();

        // Garbage-Envelope gegen eine existierende Session vs.
        // beliebige Anfrage gegen eine erfundene Session-ID
        let bekannt = dienst_fehler_antwort(
            &state,
            registrierung.session_id,
            &DienstFehler::Session(SessionFehler::Integritaetsfehler),
        );
        let unbekannt = dienst_fehler_antwort(
            &state,
            Uuid::new_v4(),
            &DienstFehler::Session(SessionFehler::SessionNichtGefunden),
        );

        assert_eq!(bekannt.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(bekannt.status(), unbekannt.status());

        let body_bekannt = axum::body::to_bytes(bekannt.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_unbekannt = axum::body::to_bytes(unbekannt.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body_bekannt, body_unbekannt);
    }
}
