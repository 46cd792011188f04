use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{null_as_default, present, EntityKind, InterworkingService, RegistryEntity};
use crate::validation::RequiredFields;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSpace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub interworking_services: Vec<InterworkingService>,

    #[serde(default)]
    pub owner: Option<String>,
}

impl RegistryEntity for SmartSpace {
    const KIND: EntityKind = EntityKind::SmartSpace;

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
            .list("interworkingServices", &self.interworking_services, InterworkingService::is_complete)
            .text("owner", self.owner.as_deref())
            .finish()
    }

    fn owner(&self) -> Option<&str> {
        present(self.owner.as_ref())
    }

    fn log_summary(&self, context: &str) {
        debug!(
            context,
            smart_space_id = ?self.id,
            name = ?self.name,
            owner = ?self.owner(),
            services = self.interworking_services.len(),
            "SmartSpace"
        );
    }
}
