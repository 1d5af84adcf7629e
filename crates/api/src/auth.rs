//! Bearer-token guard for the admin endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by an admin token (HS256, signed with `JWT_SECRET`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// Extractor that only succeeds for a valid token with the admin role.
#[derive(Debug, Clone)]
pub struct Admin(pub Claims);

impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let key = DecodingKey::from_secret(state.config().jwt_secret.as_bytes());
        let claims = decode::<Claims>(bearer.token(), &key, &Validation::default())
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected admin token");
                ApiError::Unauthorized
            })?
            .claims;

        if claims.role != ADMIN_ROLE {
            return Err(ApiError::Forbidden(format!("role {:?} may not do this", claims.role)));
        }
        tracing::debug!(sub = %claims.sub, "admin request");
        Ok(Admin(claims))
    }
}
