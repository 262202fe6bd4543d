use axum::extract::{FromRequest, Request};
use axum::Json;
use birthcare_core::error::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs `validator` rules before the handler sees the
/// payload. Parse and validation failures both surface as 422s.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(anyhow::anyhow!("Json parse error: {}", e)))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
