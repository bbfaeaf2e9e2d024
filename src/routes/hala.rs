//! Hall CRUD endpoints. All of them sit behind the auth middleware.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::database::{Hala, HalaPayload, StoreError};
use crate::server::AppState;

fn store_failure(e: StoreError) -> StatusCode {
    tracing::error!("Hala store error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// `GET /hala`
pub async fn list_hale(State(state): State<AppState>) -> Result<Json<Vec<Hala>>, StatusCode> {
    let hale = state.store.list().await.map_err(store_failure)?;
    Ok(Json(hale))
}

/// `GET /hala/{id}`
pub async fn get_hala(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Hala>, StatusCode> {
    state
        .store
        .get(id)
        .await
        .map_err(store_failure)?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `POST /hala`, answers `201` with a `Location` header.
pub async fn create_hala(
    State(state): State<AppState>,
    Json(payload): Json<HalaPayload>,
) -> Result<Response, StatusCode> {
    let hala = state.store.insert(payload).await.map_err(store_failure)?;
    tracing::info!("Created hala {}", hala.id);

    let location = format!("/hala/{}", hala.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(hala)).into_response())
}

/// `PUT /hala/{id}`, replaces `nazwa` and `adres`.
pub async fn update_hala(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<HalaPayload>,
) -> StatusCode {
    match state.store.update(id, payload).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => store_failure(e),
    }
}

/// `DELETE /hala/{id}`, answers with the removed record.
pub async fn delete_hala(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Hala>, StatusCode> {
    let removed = state.store.delete(id).await.map_err(store_failure)?;
    match removed {
        Some(hala) => {
            tracing::info!("Deleted hala {}", hala.id);
            Ok(Json(hala))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}
