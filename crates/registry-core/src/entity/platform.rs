use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{null_as_default, present, EntityKind, InterworkingService, RegistryEntity};
use crate::validation::RequiredFields;

/// A platform registered with the core. A platform owns itself: writes to
/// it are authorized against its own id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub interworking_services: Vec<InterworkingService>,

    /// Enabler platforms offer services to other platforms
    #[serde(default)]
    pub enabler: bool,
}

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, line: impl Into<String>) -> Self {
        self.description.push(line.into());
        self
    }

    pub fn with_service(mut self, service: InterworkingService) -> Self {
        self.interworking_services.push(service);
        self
    }
}

impl RegistryEntity for Platform {
    const KIND: EntityKind = EntityKind::Platform;
    const GOVERNING_FIELD: Option<&'static str> = Some("id");

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
            .finish()
    }

    fn owner(&self) -> Option<&str> {
        self.id()
    }

    fn governing_platform(&self) -> Option<&str> {
        self.id()
    }

    fn log_summary(&self, context: &str) {
        debug!(
            context,
            platform_id = ?self.id,
            name = ?self.name,
            services = self.interworking_services.len(),
            enabler = self.enabler,
            "Platform"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let platform: Platform = serde_json::from_str(
            r#"{"id":"P1","name":"Lab","description":["test lab"],
                "interworkingServices":[{"url":"https://lab.example.org","informationModelId":"IM1"}]}"#,
        )
        .unwrap();

        assert_eq!(platform.id(), Some("P1"));
        assert_eq!(platform.interworking_services[0].url.as_deref(), Some("https://lab.example.org"));
        assert!(!platform.enabler);
        assert!(platform.missing_fields().is_empty());

        let json = serde_json::to_value(&platform).unwrap();
        assert_eq!(json["interworkingServices"][0]["informationModelId"], "IM1");
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let platform: Platform =
            serde_json::from_str(r#"{"name":"Lab","description":null,"interworkingServices":null}"#).unwrap();
        assert_eq!(platform.missing_fields(), vec!["description", "interworkingServices"]);
    }

    #[test]
    fn test_incomplete_service_makes_platform_incomplete() {
        let platform = Platform::new("Lab")
            .with_description("test lab")
            .with_service(InterworkingService::new("", "IM1"));
        assert_eq!(platform.missing_fields(), vec!["interworkingServices"]);
    }

    #[test]
    fn test_platform_governs_itself() {
        let mut platform = Platform::new("Lab");
        assert_eq!(platform.governing_platform(), None);
        platform.set_id("P1".to_string());
        assert_eq!(platform.governing_platform(), Some("P1"));
        assert_eq!(platform.owner(), Some("P1"));
    }
}
