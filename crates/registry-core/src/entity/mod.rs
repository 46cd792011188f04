//! Registry entities
//!
//! The five managed entity types share one lifecycle. [`RegistryEntity`]
//! carries everything the pipeline needs to know about a type: where it is
//! stored, how it appears on the wire, which fields are required and which
//! platform governs writes to it.

pub mod device;
pub mod information_model;
pub mod platform;
pub mod resource;
pub mod smart_space;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Debug;

pub use device::Device;
pub use information_model::{InformationModel, RdfFormat};
pub use platform::Platform;
pub use resource::{Resource, ResourceType};
pub use smart_space::SmartSpace;

/// Entity type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Platform,
    Resource,
    SmartSpace,
    Device,
    InformationModel,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Platform,
        EntityKind::Resource,
        EntityKind::SmartSpace,
        EntityKind::Device,
        EntityKind::InformationModel,
    ];

    /// Segment used in queue names, routing keys and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Resource => "resource",
            Self::SmartSpace => "smart_space",
            Self::Device => "device",
            Self::InformationModel => "information_model",
        }
    }

    /// Human-readable name used in reply messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Resource => "resource",
            Self::SmartSpace => "smart space",
            Self::Device => "device",
            Self::InformationModel => "information model",
        }
    }

    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Platform => "platforms",
            Self::Resource => "resources",
            Self::SmartSpace => "smart_spaces",
            Self::Device => "devices",
            Self::InformationModel => "information_models",
        }
    }

    /// Field holding the entity in a reply payload
    pub fn response_field(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Resource => "resource",
            Self::SmartSpace => "smartSpace",
            Self::Device => "device",
            Self::InformationModel => "informationModel",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of every registry entity
pub trait RegistryEntity:
    Serialize + DeserializeOwned + Clone + Debug + Unpin + Send + Sync + 'static
{
    const KIND: EntityKind;

    /// Wire name of the field naming the governing platform, for entities
    /// whose writes are authorized against a platform.
    const GOVERNING_FIELD: Option<&'static str> = None;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Names of required fields that are missing or empty, in declaration order
    fn missing_fields(&self) -> Vec<&'static str>;

    /// Owner reference of this entity
    fn owner(&self) -> Option<&str>;

    /// Platform whose owner may write this entity
    fn governing_platform(&self) -> Option<&str> {
        None
    }

    /// Emit a debug event describing this entity
    fn log_summary(&self, context: &str);
}

/// The value, unless it is absent or empty
pub(crate) fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Treat an explicit `null` like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Endpoint through which a platform or smart space exposes an information model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterworkingService {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub information_model_id: Option<String>,
}

impl InterworkingService {
    pub fn new(url: impl Into<String>, information_model_id: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            information_model_id: Some(information_model_id.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        present(self.url.as_ref()).is_some() && present(self.information_model_id.as_ref()).is_some()
    }
}
