//! Bearer-token authentication.
//!
//! Tokens are issued by the upstream identity provider and validated here
//! with the shared HS256 secret. The middleware turns valid claims into an
//! [`AuthContext`] stored in request extensions; handlers extract it via
//! `FromRequestParts`.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use birthcare_core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::Role;
use crate::startup::AppState;

/// Claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Caller role (`admin`, `owner`, `staff`)
    pub role: String,
    /// Facility the caller works at; set for staff, absent for admins
    pub facility_id: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Validates access tokens against the shared signing secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
        }
    }

    /// Validate and decode an access token.
    pub fn verify(&self, token: &str) -> Result<Claims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }
}

/// Authenticated caller, parsed into the types the rest of the service uses.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub facility_id: Option<Uuid>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AppError::Unauthenticated(anyhow::anyhow!("Token subject is not a valid user id"))
        })?;

        let role = Role::parse(&claims.role).ok_or_else(|| {
            AppError::Unauthenticated(anyhow::anyhow!(
                "Token carries an unrecognized role: {}",
                claims.role
            ))
        })?;

        let facility_id = match claims.facility_id.as_deref() {
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
                AppError::Unauthenticated(anyhow::anyhow!(
                    "Token facility_id is not a valid facility id"
                ))
            })?),
            None => None,
        };

        Ok(Self {
            user_id,
            role,
            facility_id,
        })
    }
}

/// Middleware to require authentication on everything under `/api`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = token.ok_or_else(|| {
        AppError::Unauthenticated(anyhow::anyhow!("Missing or invalid Authorization header"))
    })?;

    let claims = state
        .verifier
        .verify(token)
        .map_err(AppError::Unauthenticated)?;

    let context = AuthContext::from_claims(&claims)?;

    // Store the context in request extensions so handlers can access it
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Middleware guarding the `/api/admin` surface.
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, AppError> {
    let context = req.extensions().get::<AuthContext>().ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!(
            "Auth context missing from request extensions"
        ))
    })?;

    if context.role != Role::Admin {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Administrator role required"
        )));
    }

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Auth context missing from request extensions"
                ))
            })
    }
}
