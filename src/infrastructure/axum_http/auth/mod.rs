use axum::{
    Json, RequestPartsExt, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::config_loader, domain::value_objects::iam::Actor,
    infrastructure::axum_http::error_responses::ErrorResponse,
};

/// Claims of a bearer token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
    pub is_staff: bool,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            is_staff: self.is_staff,
        }
    }
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        warn!(
            reason = %self.0,
            status = status.as_u16(),
            "auth: request rejected"
        );

        (
            status,
            Json(ErrorResponse {
                code: status.as_u16(),
                error: format!("Unauthorized: {}", self.0),
            }),
        )
            .into_response()
    }
}

pub fn validate_access_token(token: &str) -> Result<AccessClaims, AuthError> {
    let auth_secret = config_loader::get_auth_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load auth secret: {}", e))?;

    let decoding_key = DecodingKey::from_secret(auth_secret.secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<AccessClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn is_staff_role(role: &str) -> bool {
    config_loader::get_auth_secret()
        .map(|auth_secret| auth_secret.staff_role == role)
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| anyhow::anyhow!("Missing or malformed bearer token"))?;

        let claims = validate_access_token(bearer.token())?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| anyhow::anyhow!("Invalid user ID in token"))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            is_staff: is_staff_role(&claims.role),
            role: claims.role,
        })
    }
}
