/// Session tokens for the catalog API.
///
/// `POST /auth/login` checks a username/secret pair against a [`CredentialStore`] and
/// answers with an HS256 JWT. Protected routes go through [`require_bearer`].
use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;
use crate::server::AppState;

pub trait CredentialStore: Send + Sync {
    fn verify(&self, username: &str, secret: &str) -> bool;
}

pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, username: &str, secret: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == secret)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenIssuer {
    /// The issuer doubles as the audience.
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iss: self.issuer.clone(),
            aud: self.issuer.clone(),
            iat,
            exp: iat.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.issuer]);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "rejected bearer token");
                AppError::Unauthorized
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !state.credentials.verify(&login.username, &login.password) {
        info!(username = %login.username, "login rejected");
        return Err(AppError::InvalidCredentials);
    }
    let token = state.tokens.issue(&login.username)?;
    info!(username = %login.username, "issued session token");
    Ok(Json(LoginResponse { token }))
}

/// Reject requests without a valid bearer token; stash the claims for handlers.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = extract_bearer(req.headers()).ok_or(AppError::Unauthorized)?;
        state.tokens.validate(token)?
    };
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"unit-test-secret", "catalog-api", Duration::from_secs(3600))
    }

    #[test]
    fn static_credentials_verify_exact_pairs() {
        let store = StaticCredentials::new(crate::config::builtin_users());
        assert!(store.verify("imran", "password1"));
        assert!(store.verify("rishabh", "password2"));
        assert!(!store.verify("imran", "password2"));
        assert!(!store.verify("IMRAN", "password1"));
        assert!(!store.verify("nobody", ""));
    }

    #[test]
    fn issued_token_validates_with_claims() {
        let tokens = issuer();
        let token = tokens.issue("imran").unwrap();
        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.sub, "imran");
        assert_eq!(claims.iss, "catalog-api");
        assert_eq!(claims.aud, "catalog-api");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let other = TokenIssuer::new(b"unit-test-secret", "someone-else", Duration::from_secs(60));
        let token = other.issue("imran").unwrap();
        assert!(matches!(issuer().validate(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let other = TokenIssuer::new(b"another-secret", "catalog-api", Duration::from_secs(60));
        let token = other.issue("imran").unwrap();
        assert!(matches!(issuer().validate(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "imran".to_string(),
            iss: "catalog-api".to_string(),
            aud: "catalog-api".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert!(matches!(issuer().validate(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));
    }
}
