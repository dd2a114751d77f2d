//! Request body extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON request body whose rejections render as `AppError::BadRequest`.
///
/// A body that fails to deserialize (unknown enum value, missing field,
/// wrong content type) answers 400 with the usual `{"error", "code"}` JSON
/// instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidatedJson<T>(pub T);
