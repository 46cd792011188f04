use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{null_as_default, present, EntityKind, RegistryEntity};
use crate::validation::RequiredFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Sensor,
    Actuator,
    Service,
    MobileSensor,
}

/// A resource exposed by a platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,

    #[serde(default)]
    pub interworking_service_url: Option<String>,

    /// Platform the resource belongs to; its owner authorizes every write
    #[serde(default)]
    pub platform_id: Option<String>,

    #[serde(default)]
    pub resource_type: Option<ResourceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub located_at: Option<String>,
}

impl Resource {
    pub fn new(
        name: impl Into<String>,
        platform_id: impl Into<String>,
        interworking_service_url: impl Into<String>,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            name: Some(name.into()),
            platform_id: Some(platform_id.into()),
            interworking_service_url: Some(interworking_service_url.into()),
            resource_type: Some(resource_type),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, line: impl Into<String>) -> Self {
        self.description.push(line.into());
        self
    }
}

impl RegistryEntity for Resource {
    const KIND: EntityKind = EntityKind::Resource;
    const GOVERNING_FIELD: Option<&'static str> = Some("platformId");

    fn id(&self) -> Option<&str> {
        present(self.id.as_ref())
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        RequiredFields::new()
            .text("name", self.name.as_deref())
            .list("description", &self.description, |d| !d.is_empty())
            .text("interworkingServiceUrl", self.interworking_service_url.as_deref())
            .text("platformId", self.platform_id.as_deref())
            .present("resourceType", self.resource_type.is_some())
            .finish()
    }

    fn owner(&self) -> Option<&str> {
        present(self.platform_id.as_ref())
    }

    fn governing_platform(&self) -> Option<&str> {
        present(self.platform_id.as_ref())
    }

    fn log_summary(&self, context: &str) {
        debug!(
            context,
            resource_id = ?self.id,
            name = ?self.name,
            platform_id = ?self.platform_id,
            resource_type = ?self.resource_type,
            "Resource"
        );
    }
}
