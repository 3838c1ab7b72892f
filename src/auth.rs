// src/auth.rs
//! Credential sources for the bearer token.
//!
//! A read or write asks its provider exactly once, at bind time, and reuses
//! the token for every request of that operation.

use crate::constants::{NOTION_SECRET_TYPE, NOTION_TOKEN_ENV, NOTION_TOKEN_KEY};
use crate::types::AuthToken;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(
        "No Notion authentication token found. Please set {env_var} environment variable or create a secret. (tried: {})",
        .tried.join(", ")
    )]
    NotFound {
        env_var: &'static str,
        tried: Vec<String>,
    },

    #[error("Token from {source_name} is unusable: {reason}")]
    Unusable { source_name: String, reason: String },
}

/// The ability to hand out a bearer token.
pub trait TokenProvider {
    /// Returns `Ok(None)` when this source simply has no token.
    fn lookup(&self) -> Result<Option<AuthToken>, AuthError>;

    /// Short label used in diagnostics.
    fn name(&self) -> String;

    fn token(&self) -> Result<AuthToken, AuthError> {
        self.lookup()?.ok_or_else(|| AuthError::NotFound {
            env_var: NOTION_TOKEN_ENV,
            tried: vec![self.name()],
        })
    }
}

/// Reads the token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(NOTION_TOKEN_ENV)
    }
}

impl TokenProvider for EnvTokenProvider {
    fn lookup(&self) -> Result<Option<AuthToken>, AuthError> {
        match std::env::var(&self.var) {
            Ok(value) => AuthToken::new(value).map(Some).map_err(|e| AuthError::Unusable {
                source_name: self.name(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(None),
        }
    }

    fn name(&self) -> String {
        format!("env:{}", self.var)
    }
}

/// A named key-value secret.
#[derive(Debug, Clone, Default)]
pub struct Secret {
    pub scope: Vec<String>,
    pub values: HashMap<String, String>,
}

/// In-process registry of key-value secrets.
///
/// Secrets are created by type name; only the `token` option is retained.
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    secrets: HashMap<String, Secret>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a secret of the given type.
    pub fn create_secret<'a>(
        &mut self,
        secret_type: &str,
        scope: Vec<String>,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let scope = if scope.is_empty() {
            vec![NOTION_SECRET_TYPE.to_string()]
        } else {
            scope
        };

        let values = options
            .into_iter()
            .filter(|(key, _)| *key == NOTION_TOKEN_KEY)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        log::debug!("Registered '{}' secret (scope: {:?})", secret_type, scope);
        self.secrets
            .insert(secret_type.to_string(), Secret { scope, values });
    }

    pub fn lookup_secret(&self, secret_type: &str) -> Option<&Secret> {
        self.secrets.get(secret_type)
    }
}

impl TokenProvider for SecretStore {
    fn lookup(&self) -> Result<Option<AuthToken>, AuthError> {
        let Some(value) = self
            .lookup_secret(NOTION_SECRET_TYPE)
            .and_then(|secret| secret.values.get(NOTION_TOKEN_KEY))
        else {
            return Ok(None);
        };
        if value.trim().is_empty() {
            log::debug!("Ignoring empty token in {}", self.name());
            return Ok(None);
        }

        AuthToken::new(value.as_str())
            .map(Some)
            .map_err(|e| AuthError::Unusable {
                source_name: self.name(),
                reason: e.to_string(),
            })
    }

    fn name(&self) -> String {
        format!("secret:{}", NOTION_SECRET_TYPE)
    }
}

/// Providers tried in order; the first one holding a token wins.
#[derive(Default)]
pub struct TokenChain {
    providers: Vec<Box<dyn TokenProvider>>,
}

impl TokenChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl TokenProvider for TokenChain {
    fn lookup(&self) -> Result<Option<AuthToken>, AuthError> {
        for provider in &self.providers {
            if let Some(token) = provider.lookup()? {
                log::debug!("Using token from {}", provider.name());
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    fn name(&self) -> String {
        self.providers
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn token(&self) -> Result<AuthToken, AuthError> {
        self.lookup()?.ok_or_else(|| AuthError::NotFound {
            env_var: NOTION_TOKEN_ENV,
            tried: self.providers.iter().map(|p| p.name()).collect(),
        })
    }
}

/// A fixed token, for callers that already hold one.
#[derive(Debug, Clone)]
pub struct StaticToken(pub AuthToken);

impl TokenProvider for StaticToken {
    fn lookup(&self) -> Result<Option<AuthToken>, AuthError> {
        Ok(Some(self.0.clone()))
    }

    fn name(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_store_keeps_only_token() {
        let mut store = SecretStore::new();
        store.create_secret(
            "notion",
            Vec::new(),
            [("token", "ntn_from_secret"), ("other", "ignored")],
        );

        let secret = store.lookup_secret("notion").unwrap();
        assert_eq!(secret.scope, vec!["notion".to_string()]);
        assert_eq!(secret.values.len(), 1);
        assert_eq!(store.token().unwrap().as_str(), "ntn_from_secret");
    }

    #[test]
    fn test_chain_prefers_first_provider() {
        let mut store = SecretStore::new();
        store.create_secret("notion", Vec::new(), [("token", "ntn_first")]);
        let chain = TokenChain::new()
            .with_provider(store)
            .with_provider(StaticToken(AuthToken::new("ntn_second").unwrap()));

        assert_eq!(chain.token().unwrap().as_str(), "ntn_first");
    }

    #[test]
    fn test_chain_falls_through_empty_store() {
        let chain = TokenChain::new()
            .with_provider(SecretStore::new())
            .with_provider(StaticToken(AuthToken::new("ntn_second").unwrap()));

        assert_eq!(chain.token().unwrap().as_str(), "ntn_second");
    }

    #[test]
    fn test_chain_without_token_fails() {
        let chain = TokenChain::new()
            .with_provider(SecretStore::new())
            .with_provider(EnvTokenProvider::new("NOTION2TABLE_TEST_UNSET_VARIABLE"));

        let err = chain.token().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("No Notion authentication token found"));
        assert!(message.contains("secret:notion"));
        assert!(message.contains("env:NOTION2TABLE_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn test_empty_secret_token_falls_through() {
        let mut store = SecretStore::new();
        store.create_secret("notion", Vec::new(), [("token", "")]);
        assert!(store.lookup().unwrap().is_none());

        let chain = TokenChain::new()
            .with_provider(store)
            .with_provider(StaticToken(AuthToken::new("ntn_from_env").unwrap()));
        assert_eq!(chain.token().unwrap().as_str(), "ntn_from_env");
    }

    #[test]
    fn test_malformed_secret_token_is_unusable() {
        let mut store = SecretStore::new();
        store.create_secret("notion", Vec::new(), [("token", "ntn_a\r\nX: 1")]);
        assert!(matches!(store.token(), Err(AuthError::Unusable { .. })));
    }
}
