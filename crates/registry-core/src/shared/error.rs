//! Registry Error Types
//!
//! Every failure of the request pipeline is one of these variants, and each
//! variant maps to exactly one reply status code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Payload is not a well-formed entity
    #[error("could not parse payload")]
    Decode { reason: String },

    /// Required fields are null or empty
    #[error("{entity} is incomplete: missing {}", .fields.join(", "))]
    Validation {
        entity: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl RegistryError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode { reason: reason.into() }
    }

    pub fn validation(entity: &'static str, fields: Vec<&'static str>) -> Self {
        Self::Validation { entity, fields }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store(reason.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Reply status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Decode { .. } | Self::Validation { .. } => 400,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Store(_) | Self::Broker(_) | Self::Serialization(_) | Self::Configuration { .. } => 500,
        }
    }
}

impl From<mongodb::error::Error> for RegistryError {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Store(e.to_string())
    }
}

impl From<registry_queue::QueueError> for RegistryError {
    fn from(e: registry_queue::QueueError) -> Self {
        Self::Broker(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
