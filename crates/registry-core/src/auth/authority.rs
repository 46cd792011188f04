//! Token Authority
//!
//! Signature and validity verification of bearer tokens.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use registry_config::TokenAuthorityConfig;

use super::claims::TokenClaims;
use crate::shared::error::{RegistryError, Result};

/// Outcome of a verification the authority was able to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerdict {
    Valid,
    Invalid(String),
}

/// Confirms that a token was issued by a trusted party and is still valid.
///
/// `Err` means the authority could not reach a verdict, which callers must
/// treat differently from an invalid token.
#[async_trait]
pub trait TokenAuthority: Send + Sync {
    /// Whether verification is switched on at all
    fn is_enabled(&self) -> bool;

    async fn verify(&self, token: &str) -> Result<TokenVerdict>;
}

/// JWT signature verification with a configured key
pub struct JwtTokenAuthority {
    enabled: bool,
    algorithm: Algorithm,
    decoding_key: Option<DecodingKey>,
    issuer: Option<String>,
}

impl JwtTokenAuthority {
    /// Authority with verification switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            algorithm: Algorithm::HS256,
            decoding_key: None,
            issuer: None,
        }
    }

    pub fn hs256(secret: &[u8], issuer: Option<String>) -> Self {
        Self {
            enabled: true,
            algorithm: Algorithm::HS256,
            decoding_key: Some(DecodingKey::from_secret(secret)),
            issuer,
        }
    }

    pub fn rs256(public_key_pem: &[u8], issuer: Option<String>) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| RegistryError::configuration(format!("Invalid RSA public key: {}", e)))?;
        Ok(Self {
            enabled: true,
            algorithm: Algorithm::RS256,
            decoding_key: Some(decoding_key),
            issuer,
        })
    }

    pub fn from_config(config: &TokenAuthorityConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let issuer = Some(config.issuer.clone()).filter(|i| !i.is_empty());
        match config.algorithm.as_str() {
            "HS256" => Ok(Self::hs256(config.secret.as_bytes(), issuer)),
            "RS256" => {
                let pem = std::fs::read(&config.public_key_path).map_err(|e| {
                    RegistryError::configuration(format!(
                        "Failed to read public key {}: {}",
                        config.public_key_path, e
                    ))
                })?;
                Self::rs256(&pem, issuer)
            }
            other => Err(RegistryError::configuration(format!(
                "Unsupported token algorithm: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl TokenAuthority for JwtTokenAuthority {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn verify(&self, token: &str) -> Result<TokenVerdict> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| RegistryError::configuration("Token authority has no verification key"))?;

        let mut validation = Validation::new(self.algorithm);
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(match decode::<TokenClaims>(token, key, &validation) {
            Ok(_) => TokenVerdict::Valid,
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    TokenVerdict::Invalid("token expired".to_string())
                }
                _ => TokenVerdict::Invalid(e.to_string()),
            },
        })
    }
}
