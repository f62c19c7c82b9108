use std::collections::HashMap;
use std::time::Duration;

use catalog_common::catalog::CatalogClientConfig;
use product_filter::WordRanking;

use crate::error::AppError;

const BUILTIN_USERS: &[(&str, &str)] = &[("imran", "password1"), ("rishabh", "password2")];

#[derive(Clone)]
pub struct Config {
    pub listen_addr: String,
    pub jwt_key: String,
    pub jwt_issuer: String,
    pub token_ttl: Duration,
    pub word_ranking: WordRanking,
    pub users: HashMap<String, String>,
    pub catalog: CatalogClientConfig,
}

impl Config {
    /// Required:
    /// - `JWT_KEY` (HMAC secret used to sign session tokens)
    ///
    /// Optional:
    /// - `JWT_ISSUER` (default: "catalog-api"), also used as the audience
    /// - `JWT_TTL_SECS` (default: 3600)
    /// - `LISTEN_ADDR` (default: "0.0.0.0:8080")
    /// - `WORD_SKIP_COUNT` / `WORD_TOP_COUNT` (default: 5 / 10)
    /// - `AUTH_USERS` as `user:secret,user2:secret2` (default: built-in users)
    /// - `CATALOG_*`, see [`CatalogClientConfig::from_env`]
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_key = std::env::var("JWT_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Config("JWT_KEY environment variable is required".to_string()))?;

        let jwt_issuer =
            std::env::var("JWT_ISSUER").unwrap_or_else(|_| "catalog-api".to_string());

        let token_ttl = std::env::var("JWT_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(3600));

        let listen_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let defaults = WordRanking::default();
        let word_ranking = WordRanking::new(
            env_usize("WORD_SKIP_COUNT").unwrap_or(defaults.skip),
            env_usize("WORD_TOP_COUNT").unwrap_or(defaults.take),
        );

        let users = match std::env::var("AUTH_USERS") {
            Ok(spec) => parse_users(&spec)?,
            Err(_) => builtin_users(),
        };

        Ok(Self {
            listen_addr,
            jwt_key,
            jwt_issuer,
            token_ttl,
            word_ranking,
            users,
            catalog: CatalogClientConfig::from_env(),
        })
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.parse::<usize>().ok())
}

pub fn builtin_users() -> HashMap<String, String> {
    BUILTIN_USERS
        .iter()
        .map(|(user, secret)| (user.to_string(), secret.to_string()))
        .collect()
}

/// Parse `user:secret` pairs separated by commas. Secrets may contain `:`.
pub fn parse_users(spec: &str) -> Result<HashMap<String, String>, AppError> {
    let mut users = HashMap::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (user, secret) = entry
            .split_once(':')
            .filter(|(user, secret)| !user.is_empty() && !secret.is_empty())
            .ok_or_else(|| AppError::Config(format!("invalid AUTH_USERS entry: {entry}")))?;
        users.insert(user.to_string(), secret.to_string());
    }
    if users.is_empty() {
        return Err(AppError::Config("AUTH_USERS must list at least one user".to_string()));
    }
    Ok(users)
}
