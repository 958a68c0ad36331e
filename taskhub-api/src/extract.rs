/// Request extractors whose rejections use the API error body
///
/// Drop-in replacements for `axum::Json` and `axum::extract::Path` in
/// handler arguments. A body or path that does not parse comes back as
/// `{"error": ..., "message": ...}` instead of axum's plain-text rejection.
///
/// # Example
///
/// ```
/// use taskhub_api::{error::ApiResult, extract::{AppJson, AppPath}};
/// use serde::Deserialize;
/// use uuid::Uuid;
///
/// #[derive(Deserialize)]
/// struct Rename {
///     name: String,
/// }
///
/// async fn rename(AppPath(id): AppPath<Uuid>, AppJson(req): AppJson<Rename>) -> ApiResult<String> {
///     Ok(format!("{} -> {}", id, req.name))
/// }
/// ```

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
