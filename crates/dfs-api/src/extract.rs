use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections (malformed JSON, wrong field types, missing content type)
/// are answered with the usual error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
