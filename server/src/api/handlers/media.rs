//! Katalogliste und Chunk-Download

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;

use crate::api::{dienst_fehler_antwort, envelope_antwort, session_id_aus_headers, AppState};

/// GET /api/list: versiegelte Katalogliste
pub async fn get_list(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session_id = match session_id_aus_headers(&headers) {
        Ok(id) => id,
        Err(r) => return r,
    };

    match state.dienst.liste(session_id) {
        Ok(envelope) => envelope_antwort(StatusCode::OK, &envelope),
        Err(e) => dienst_fehler_antwort(&state, session_id, &e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Katalog-ID des Mediums
    pub id: String,
    /// Chunk-Index, beginnend bei 0
    pub chunk: u64,
}

/// GET /api/download?id=...&chunk=...: versiegelter Chunk
pub async fn get_download(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let session_id = match session_id_aus_headers(&headers) {
        Ok(id) => id,
        Err(r) => return r,
    };

    match state
        .dienst
        .download(session_id, &query.id, query.chunk)
        .await
    {
        Ok(envelope) => envelope_antwort(StatusCode::OK, &envelope),
        Err(e) => dienst_fehler_antwort(&state, session_id, &e),
    }
}
