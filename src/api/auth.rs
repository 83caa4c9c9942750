use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::RegistryError;

type TokenDigest = [u8; 32];

/// Bearer-token allow/deny decision for mutating routes.
///
/// An open gate lets every request through. A gate loaded from a tokens file
/// only admits requests whose bearer token appears in that file; tokens are
/// kept as SHA-256 digests, never in clear.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    tokens: Option<HashSet<TokenDigest>>,
}

impl AccessGate {
    pub fn open() -> Self {
        Self { tokens: None }
    }

    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            tokens: Some(tokens.into_iter().map(|t| digest(t.as_ref())).collect()),
        }
    }

    /// Parse a tokens file: one token per line, `#` starts a comment line.
    pub fn parse(contents: &str) -> Self {
        Self::from_tokens(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tokens file {}", path.display()))?;

        let gate = Self::parse(&contents);
        if gate.token_count() == 0 {
            log::warn!(
                "Tokens file {} has no tokens; all mutating requests will be rejected",
                path.display()
            );
        } else {
            log::info!(
                "Loaded {} bearer tokens from {}",
                gate.token_count(),
                path.display()
            );
        }
        Ok(gate)
    }

    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        match &config.tokens_file {
            Some(path) => Self::from_file(path),
            None => {
                log::warn!("No tokens file configured; mutating routes are unauthenticated");
                Ok(Self::open())
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.tokens.is_none()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.as_ref().map_or(0, HashSet::len)
    }

    pub fn is_authorized(&self, credential: Option<&str>) -> bool {
        let Some(tokens) = &self.tokens else {
            return true;
        };

        match credential {
            Some(token) if tokens.contains(&digest(token)) => true,
            Some(token) => {
                log::warn!("Rejected unknown bearer token {}", fingerprint(token));
                false
            }
            None => {
                log::warn!("Rejected request without bearer token");
                false
            }
        }
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

/// Short, non-reversible label for a token in logs
fn fingerprint(token: &str) -> String {
    hex::encode(&digest(token)[..4])
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum extractor that passes only requests the access gate admits.
/// Add it as a handler argument to gate that route.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

#[async_trait]
impl<S> FromRequestParts<S> for Authorized
where
    Arc<AccessGate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RegistryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AccessGate>::from_ref(state);

        if gate.is_authorized(bearer_token(&parts.headers)) {
            Ok(Authorized)
        } else {
            Err(RegistryError::Unauthorized)
        }
    }
}
