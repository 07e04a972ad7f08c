use std::collections::HashSet;
use std::sync::RwLock;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::analytics::scope::Actor;
use crate::models::user::UserRole;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub company_id: Uuid,
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor {
            company_id: self.company_id,
            user_id: self.sub,
            role: self.role,
        }
    }
}

/// Token revocation as an injected capability rather than module state, so a
/// multi-process deployment can back it with a shared store.
pub trait RevocationStore: Send + Sync {
    fn is_revoked(&self, token: &str) -> bool;
    fn revoke(&self, token: String);
}

#[derive(Default)]
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashSet<String>>,
}

impl RevocationStore for InMemoryRevocationStore {
    fn is_revoked(&self, token: &str) -> bool {
        self.revoked
            .read()
            .expect("revocation store lock poisoned")
            .contains(token)
    }

    fn revoke(&self, token: String) {
        self.revoked
            .write()
            .expect("revocation store lock poisoned")
            .insert(token);
    }
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"bad_authorization"})),
        )
            .into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response();
    };

    if state.revocation.is_revoked(token) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"token_revoked"})),
        )
            .into_response();
    }

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_token"})),
        )
            .into_response(),
    }
}
