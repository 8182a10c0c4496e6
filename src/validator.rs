use anyhow::anyhow;
use axum::{
    Form,
    extract::{FromRequest, Request, rejection::FormRejection},
};
use signflow_core::{AppError, field_errors_from};
use signflow_models::FromFormPairs;
use validator::Validate;

/// Extracts a form-encoded body, decodes it with [`FromFormPairs`] and runs
/// `validator` on the result. Both decoding and validation failures become a
/// 422 with field-level messages.
#[derive(Debug, Clone, Default)]
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: FromFormPairs + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                FormRejection::InvalidFormContentType(_) => AppError::bad_request(anyhow!(
                    "Expected 'Content-Type: application/x-www-form-urlencoded'"
                )),
                _ => AppError::bad_request(anyhow!("Invalid form body")),
            })?;

        let value = T::from_pairs(pairs).map_err(AppError::validation)?;

        value
            .validate()
            .map_err(|errors| AppError::validation(field_errors_from(&errors)))?;

        Ok(ValidatedForm(value))
    }
}
