use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::auth::{AccessGate, Authorized};
use crate::error::RegistryError;
use crate::logic::{DeleteResolver, ListPlan, QueryResolver, UpsertResolver};
use crate::model::{Id, ImageEntry, NewImageEntry};
use crate::store::traits::ImageStore;

/// Shared request state: the store handle and the access gate
pub struct AppState<S> {
    pub store: Arc<S>,
    pub gate: Arc<AccessGate>,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, gate: AccessGate) -> Self {
        Self {
            store,
            gate: Arc::new(gate),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<S> FromRef<AppState<S>> for Arc<AccessGate> {
    fn from_ref(state: &AppState<S>) -> Self {
        state.gate.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            log::error!("Health check failed: {:#}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageListQuery {
    pub name: Option<String>,
    pub sort: Option<String>,
}

pub async fn list_images<S: ImageStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<Vec<ImageEntry>>, RegistryError> {
    let plan = ListPlan::resolve(query.name.as_deref(), query.sort.as_deref());
    let images = QueryResolver::new(&*state.store).list(&plan).await?;
    Ok(Json(images))
}

pub async fn get_image<S: ImageStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
) -> Result<Json<ImageEntry>, RegistryError> {
    let image = QueryResolver::new(&*state.store).get_by_id(&id).await?;
    Ok(Json(image))
}

pub async fn upsert_image<S: ImageStore>(
    _: Authorized,
    State(state): State<AppState<S>>,
    payload: Result<Json<NewImageEntry>, JsonRejection>,
) -> Result<Json<ImageEntry>, RegistryError> {
    let Json(candidate) =
        payload.map_err(|rejection| RegistryError::validation(rejection.body_text()))?;

    let image = UpsertResolver::new(&*state.store).upsert(candidate).await?;
    Ok(Json(image))
}

pub async fn delete_image<S: ImageStore>(
    _: Authorized,
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
) -> Result<StatusCode, RegistryError> {
    DeleteResolver::new(&*state.store).delete_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
