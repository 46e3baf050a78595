use std::time::Instant;

use axum::{Json, extract::State};
use tracing::{Instrument, info, info_span, warn};

use dfs_common::api::{Lineup, OptimizeRequest};
use dfs_common::optimizer::{LineupOptions, build_lineups};
use dfs_common::run_id;

use crate::SharedState;
use crate::error::ApiError;
use crate::extract::ApiJson;

/// Build one lineup per projection weighting for the requested week.
pub async fn optimize(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<OptimizeRequest>,
) -> Result<Json<Vec<Lineup>>, ApiError> {
    let run_id = run_id::generate();
    let span = info_span!("optimize", %run_id, week = ?request.week, dst = ?request.dst);

    async move {
        let started = Instant::now();
        match run(&state, request).await {
            Ok(lineups) => {
                dfs_metrics::record_optimize_success(started.elapsed());
                info!(
                    lineups = lineups.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "optimize finished"
                );
                Ok(Json(lineups))
            }
            Err(err) => {
                dfs_metrics::record_optimize_failure(err.reason());
                warn!(error = %err, reason = err.reason(), "optimize failed");
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(state: &SharedState, request: OptimizeRequest) -> Result<Vec<Lineup>, ApiError> {
    request.validate()?;

    let store = state.store.clone();
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || -> Result<Vec<Lineup>, ApiError> {
        let _entered = span.enter();
        let slate = store.resolve_slate(None, request.week)?;
        let projections = store.load_projections(slate)?;
        info!(%slate, pool = projections.len(), "loaded projection table");

        let options = LineupOptions::from(&request);
        Ok(build_lineups(&projections, &options)?)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("optimizer task failed: {err}")))?
}
