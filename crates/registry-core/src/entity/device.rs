use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{null_as_default, present, EntityKind, RegistryEntity};
use crate::validation::RequiredFields;

/// A device attached to a smart space through a plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,

    #[serde(default)]
    pub smart_space_id: Option<String>,

    #[serde(default)]
    pub plugin_url: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,
}

impl RegistryEntity for Device {
    const KIND: EntityKind = EntityKind::Device;

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
            .text("smartSpaceId", self.smart_space_id.as_deref())
            .text("pluginUrl", self.plugin_url.as_deref())
            .text("owner", self.owner.as_deref())
            .finish()
    }

    fn owner(&self) -> Option<&str> {
        present(self.owner.as_ref())
    }

    fn log_summary(&self, context: &str) {
        debug!(
            context,
            device_id = ?self.id,
            name = ?self.name,
            smart_space_id = ?self.smart_space_id,
            owner = ?self.owner(),
            "Device"
        );
    }
}
