use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::server::error::ApiError;

/// Numeric `{id}` path segment. A segment that does not parse as an `i32`
/// is rejected with the usual JSON error body instead of axum's plain text.
#[derive(Debug, Clone, Copy)]
pub(super) struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(IdPath(id))
    }
}
