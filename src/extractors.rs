use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::Json;

use crate::db::models::User;
use crate::db::users;
use crate::error::AppError;
use crate::state::AppState;

/// The user behind a valid `Authorization: Bearer <jwt>` header.
/// Rejects with 401 when the header is missing, the token does not verify,
/// or the user it names no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts).ok_or(AppError::Unauthorized)?;

        let claims = state.keys.verify(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized
        })?;

        let conn = state.db.get()?;
        let user = users::find_by_id(&conn, &claims.id)?.ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}

/// A JSON request body. Wraps axum's `Json` so a missing content type, bad
/// syntax or a wrong field type comes back as a JSON error body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let parts = parts_with(Some("bearer abc"));
        assert_eq!(extract_bearer_token(&parts), Some("abc"));
    }

    #[test]
    fn missing_or_foreign_scheme_is_none() {
        assert_eq!(extract_bearer_token(&parts_with(None)), None);
        assert_eq!(extract_bearer_token(&parts_with(Some("Basic dXNlcg=="))), None);
        assert_eq!(extract_bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(extract_bearer_token(&parts_with(Some("Bearer"))), None);
    }
}
