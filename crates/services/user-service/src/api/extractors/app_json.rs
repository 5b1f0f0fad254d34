//! JSON extractor with the service's error body on rejection.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use common::AppError;

/// Like [`Json`], but a body that fails to parse or has the wrong shape is
/// answered with `400 {"error":{"code":"BAD_REQUEST",...}}`.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(
                status = %e.status(),
                reason = %e.body_text(),
                "Rejected request body"
            );
            AppError::bad_request("Invalid request body")
        })?;

        Ok(AppJson(value))
    }
}
