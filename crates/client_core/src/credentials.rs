//! Bearer-token sources injected into the HTTP client.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

/// Session key the dashboard stores its JWT access token under.
pub const ACCESS_TOKEN_KEY: &str = "jwt_access_token";

pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// A provider that never has a token. Requests still go out; the backend
/// is expected to reject them.
pub struct MissingCredential;

impl CredentialProvider for MissingCredential {
    fn access_token(&self) -> Option<String> {
        None
    }
}

pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Session-scoped key/value credential store.
#[derive(Default)]
pub struct SessionCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl SessionCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.insert(ACCESS_TOKEN_KEY, token);
        store
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

impl CredentialProvider for SessionCredentialStore {
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }
}
