//! Authentifizierung und Logout

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::{
    dienst_fehler_antwort, envelope_antwort, envelope_aus_anfrage, session_id_aus_headers,
    AppState,
};

/// POST /api/auth: versiegelte Anmeldedaten gegen den Lizenz-Store pruefen
pub async fn post_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let session_id = match session_id_aus_headers(&headers) {
        Ok(id) => id,
        Err(r) => return r,
    };
    let envelope = match envelope_aus_anfrage(&headers, &body) {
        Ok(e) => e,
        Err(r) => return r,
    };

    match state.dienst.authentifizieren(session_id, &envelope).await {
        Ok(antwort) => envelope_antwort(StatusCode::OK, &antwort),
        Err(e) => dienst_fehler_antwort(&state, session_id, &e),
    }
}

/// POST /api/logout: Session beenden
pub async fn post_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session_id = match session_id_aus_headers(&headers) {
        Ok(id) => id,
        Err(r) => return r,
    };

    if state.dienst.abmelden(session_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
