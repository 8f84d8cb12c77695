use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomerClaims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub sub: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderClaims {
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Provider account the places belong to; defaults to `sub`.
    #[serde(default)]
    pub provider_id: Option<String>,
    pub exp: usize,
}

impl ProviderClaims {
    pub fn provider_id(&self) -> &str {
        self.provider_id.as_deref().unwrap_or(&self.sub)
    }
}

fn decode_bearer<T: DeserializeOwned>(req: &Request, secret: &str) -> Result<T, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Authentification requise".to_string()))?;

    decode::<T>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::AuthenticationError("Jeton invalide ou expiré".to_string())
        })
}

fn forbidden() -> AppError {
    AppError::AuthorizationError("Accès refusé".to_string())
}

// ============================================================================
// Middlewares
// ============================================================================

pub async fn customer_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims: CustomerClaims = decode_bearer(&req, &state.auth.secret)?;
    if claims.role != "CUSTOMER" {
        return Err(forbidden());
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims: AdminClaims = decode_bearer(&req, &state.auth.secret)?;
    if claims.role != "ADMIN" && claims.role != "SUPER_ADMIN" {
        return Err(forbidden());
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn provider_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims: ProviderClaims = decode_bearer(&req, &state.auth.secret)?;
    if claims.role != "PROVIDER" {
        return Err(forbidden());
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_defaults_to_subject() {
        let mut claims = ProviderClaims {
            sub: "user-9".into(),
            email: "guide@example.org".into(),
            role: "PROVIDER".into(),
            provider_id: None,
            exp: 0,
        };
        assert_eq!(claims.provider_id(), "user-9");
        claims.provider_id = Some("prov-2".into());
        assert_eq!(claims.provider_id(), "prov-2");
    }
}
