//! Bearer token claims

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::shared::error::{RegistryError, Result};

pub const ROLE_ATTRIBUTE: &str = "role";
pub const OWNED_PLATFORM_ATTRIBUTE: &str = "owned_platform_id";
pub const PLATFORM_OWNER_ROLE: &str = "PLATFORM_OWNER";

/// Who issued the token: the core itself or a federated platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuerType {
    Core,
    Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "ityp", alias = "issuerType")]
    pub issuer_type: IssuerType,

    #[serde(rename = "att", alias = "attributes", default)]
    pub attributes: HashMap<String, String>,

    /// Expiry, seconds since the epoch
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl TokenClaims {
    /// Read the claims of a token without verifying its signature or expiry.
    ///
    /// Verification is the token authority's job; this only decides whether
    /// the token is structurally a registry token.
    pub fn parse(token: &str) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| RegistryError::forbidden(format!("malformed token: {}", e)))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn role(&self) -> Option<&str> {
        self.attribute(ROLE_ATTRIBUTE)
    }

    pub fn owned_platform_id(&self) -> Option<&str> {
        self.attribute(OWNED_PLATFORM_ATTRIBUTE)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
