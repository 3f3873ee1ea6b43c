use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable holding a pre-issued ID token for the CLI driver
const ID_TOKEN_ENV: &str = "FOOD_RESCUE_ID_TOKEN";

/// Bearer token issued by the identity provider.
#[derive(Clone)]
pub struct IdToken(String);

impl IdToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry (`exp` claim, unix seconds) read without verifying the signature.
    /// Only used for diagnostics; the backend does the real verification.
    pub fn expiry(&self) -> Option<i64> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<ExpiryClaims>(&self.0, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .and_then(|data| data.claims.exp)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry()
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

impl std::fmt::Debug for IdToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdToken")
            .field("expires_at", &self.expires_at())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Source of bearer tokens. Called fresh for every operation.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn id_token(&self) -> AppResult<IdToken>;
}

/// Token provider backed by a fixed token, typically read from the environment.
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn from_env() -> Self {
        Self {
            token: std::env::var(ID_TOKEN_ENV).ok().filter(|t| !t.is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn id_token(&self) -> AppResult<IdToken> {
        self.token
            .as_ref()
            .map(IdToken::new)
            .ok_or_else(|| AppError::Unauthenticated("no idToken".to_string()))
    }
}

/// Non-sensitive session metadata attached to load diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProbe {
    pub has_tokens: bool,
    pub id_token_expiry: Option<i64>,
}

impl SessionProbe {
    pub async fn probe(tokens: &dyn TokenProvider) -> Self {
        match tokens.id_token().await {
            Ok(token) => Self {
                has_tokens: true,
                id_token_expiry: token.expiry(),
            },
            Err(_) => Self::default(),
        }
    }
}
