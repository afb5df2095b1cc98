use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::modules::auth::model::User;
use crate::modules::auth::schema::ErrorResponse;
use crate::AppState;

/// Extractor for routes behind a bearer token. Verifies the access token,
/// loads the account and rejects deactivated ones, so handlers always get
/// a live User.
pub struct AuthUser(pub User);

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message)))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("Missing authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Authorization header must be a Bearer token"))?;

        let token_data = state
            .jwt_service
            .verify_access_token(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = state
            .users
            .find_by_id(&token_data.claims.sub)
            .await
            .map_err(|err| {
                tracing::error!("user lookup failed during auth: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
            })?
            .ok_or_else(|| unauthorized("Invalid or expired token"))?;

        if !user.is_active {
            return Err(unauthorized("Account is deactivated"));
        }

        Ok(AuthUser(user))
    }
}
