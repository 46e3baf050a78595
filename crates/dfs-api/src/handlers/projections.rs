use axum::{Json, extract::State};
use tracing::info;

use dfs_common::PlayerProjection;
use dfs_common::api::ProjectionsRequest;

use crate::SharedState;
use crate::error::ApiError;
use crate::extract::ApiJson;

/// Stored projection table for the requested (or latest) slate.
pub async fn get_projections(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<ProjectionsRequest>,
) -> Result<Json<Vec<PlayerProjection>>, ApiError> {
    dfs_metrics::record_projection_request();

    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || -> Result<Vec<PlayerProjection>, ApiError> {
        let slate = store.resolve_slate(request.year, request.week)?;
        let rows = store.load_projections(slate)?;
        info!(%slate, rows = rows.len(), "served projections");
        Ok(rows)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("projection task failed: {err}")))??;

    Ok(Json(rows))
}
