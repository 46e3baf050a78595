use axum::{Json, extract::State};
use serde_json::json;

use crate::SharedState;
use crate::error::ApiError;

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readyz(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(std::sync::atomic::Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable("shutting_down".into()));
    }

    if !state.store.is_readable() {
        return Err(ApiError::ServiceUnavailable(format!(
            "data directory {} is not readable",
            state.store.root().display()
        )));
    }

    Ok(Json(json!({
        "status": "ok",
        "data": "ok",
        "application": env!("CARGO_PKG_NAME"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn readyz_rejects_when_readiness_disabled() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = crate::test_state(tmp.path());
        state.readiness.store(false, Ordering::SeqCst);

        match readyz(State(state)).await {
            Err(ApiError::ServiceUnavailable(code)) => assert!(code.contains("shutting_down")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn readyz_rejects_missing_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = crate::test_state(&tmp.path().join("absent"));

        assert!(matches!(
            readyz(State(state)).await,
            Err(ApiError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn readyz_ok_with_readable_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = crate::test_state(tmp.path());

        let Json(body) = readyz(State(state)).await.unwrap();
        assert_eq!(body["status"], "ok");
    }
}
