//! Entity completeness checks
//!
//! An entity is complete when every required field of its type is present
//! and non-empty. Incomplete entities never reach the store.

use tracing::debug;

use crate::entity::RegistryEntity;
use crate::shared::error::{RegistryError, Result};

/// Whether every required field of the entity is present and non-empty
pub fn validate<E: RegistryEntity>(entity: &E) -> bool {
    let missing = entity.missing_fields();
    if !missing.is_empty() {
        debug!(
            entity = E::KIND.as_str(),
            id = ?entity.id(),
            missing = ?missing,
            "Entity is incomplete"
        );
    }
    missing.is_empty()
}

/// Reject an incomplete entity with a message naming its missing fields
pub fn ensure_complete<E: RegistryEntity>(entity: &E) -> Result<()> {
    if validate(entity) {
        Ok(())
    } else {
        Err(RegistryError::validation(E::KIND.label(), entity.missing_fields()))
    }
}

/// Builder collecting the names of required fields that fail their check
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(self, name: &'static str, value: Option<&str>) -> Self {
        self.present(name, value.is_some_and(|v| !v.is_empty()))
    }

    /// A collection is complete when it is non-empty and every element passes `complete`
    pub(crate) fn list<T>(self, name: &'static str, values: &[T], complete: impl Fn(&T) -> bool) -> Self {
        let ok = !values.is_empty() && values.iter().all(complete);
        self.present(name, ok)
    }

    pub(crate) fn present(mut self, name: &'static str, ok: bool) -> Self {
        if !ok {
            self.missing.push(name);
        }
        self
    }

    pub(crate) fn finish(self) -> Vec<&'static str> {
        self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Device, InformationModel, InterworkingService, Platform, RdfFormat, Resource, ResourceType, SmartSpace};

    fn complete_platform() -> Platform {
        Platform::new("Lab")
            .with_description("test lab")
            .with_service(InterworkingService::new("https://lab.example.org", "IM1"))
    }

    fn complete_resource() -> Resource {
        Resource::new("Thermometer", "P1", "https://lab.example.org", ResourceType::Sensor).with_description("room 1")
    }

    fn complete_smart_space() -> SmartSpace {
        SmartSpace {
            name: Some("Home".to_string()),
            description: vec!["flat".to_string()],
            interworking_services: vec![InterworkingService::new("https://home.example.org", "IM1")],
            owner: Some("alice".to_string()),
            ..Default::default()
        }
    }

    fn complete_device() -> Device {
        Device {
            name: Some("Hub".to_string()),
            description: vec!["kitchen hub".to_string()],
            smart_space_id: Some("S1".to_string()),
            plugin_url: Some("https://plugin.example.org".to_string()),
            owner: Some("alice".to_string()),
            ..Default::default()
        }
    }

    fn complete_information_model() -> InformationModel {
        InformationModel {
            name: Some("Core".to_string()),
            uri: Some("http://example.org/core".to_string()),
            owner: Some("alice".to_string()),
            rdf: Some("@prefix ex: <http://example.org/> .".to_string()),
            rdf_format: Some(RdfFormat::Turtle),
            ..Default::default()
        }
    }

    /// Apply each mutation to a fresh complete entity and expect the named
    /// field to be reported missing.
    fn assert_each_invalidates<E: RegistryEntity>(complete: fn() -> E, mutations: &[(&'static str, fn(&mut E))]) {
        assert!(validate(&complete()));
        for (field, mutate) in mutations {
            let mut entity = complete();
            mutate(&mut entity);
            assert!(!validate(&entity), "clearing {field} should invalidate the {}", E::KIND.label());
            assert!(entity.missing_fields().contains(field), "{field} not reported");
        }
    }

    #[test]
    fn test_complete_entities_validate() {
        assert!(validate(&complete_platform()));
        assert!(validate(&complete_resource()));
        assert!(validate(&complete_smart_space()));
        assert!(validate(&complete_device()));
        assert!(validate(&complete_information_model()));
    }

    #[test]
    fn test_resource_required_fields() {
        let mutations: [(&str, fn(&mut Resource)); 9] = [
            ("name", |r| r.name = None),
            ("name", |r| r.name = Some(String::new())),
            ("description", |r| r.description.clear()),
            ("description", |r| r.description[0] = String::new()),
            ("interworkingServiceUrl", |r| r.interworking_service_url = None),
            ("interworkingServiceUrl", |r| r.interworking_service_url = Some(String::new())),
            ("platformId", |r| r.platform_id = None),
            ("platformId", |r| r.platform_id = Some(String::new())),
            ("resourceType", |r| r.resource_type = None),
        ];
        assert_each_invalidates(complete_resource, &mutations);
    }

    #[test]
    fn test_smart_space_required_fields() {
        let mutations: [(&str, fn(&mut SmartSpace)); 9] = [
            ("name", |s| s.name = None),
            ("name", |s| s.name = Some(String::new())),
            ("description", |s| s.description.clear()),
            ("description", |s| s.description[0] = String::new()),
            ("interworkingServices", |s| s.interworking_services.clear()),
            ("interworkingServices", |s| s.interworking_services[0].url = None),
            ("interworkingServices", |s| s.interworking_services[0].information_model_id = Some(String::new())),
            ("owner", |s| s.owner = None),
            ("owner", |s| s.owner = Some(String::new())),
        ];
        assert_each_invalidates(complete_smart_space, &mutations);
    }

    #[test]
    fn test_device_required_fields() {
        let mutations: [(&str, fn(&mut Device)); 10] = [
            ("name", |d| d.name = None),
            ("name", |d| d.name = Some(String::new())),
            ("description", |d| d.description.clear()),
            ("description", |d| d.description[0] = String::new()),
            ("smartSpaceId", |d| d.smart_space_id = None),
            ("smartSpaceId", |d| d.smart_space_id = Some(String::new())),
            ("pluginUrl", |d| d.plugin_url = None),
            ("pluginUrl", |d| d.plugin_url = Some(String::new())),
            ("owner", |d| d.owner = None),
            ("owner", |d| d.owner = Some(String::new())),
        ];
        assert_each_invalidates(complete_device, &mutations);
    }

    #[test]
    fn test_information_model_required_fields() {
        let mutations: [(&str, fn(&mut InformationModel)); 9] = [
            ("name", |m| m.name = None),
            ("name", |m| m.name = Some(String::new())),
            ("uri", |m| m.uri = None),
            ("uri", |m| m.uri = Some(String::new())),
            ("owner", |m| m.owner = None),
            ("owner", |m| m.owner = Some(String::new())),
            ("rdf", |m| m.rdf = None),
            ("rdf", |m| m.rdf = Some(String::new())),
            ("rdfFormat", |m| m.rdf_format = None),
        ];
        assert_each_invalidates(complete_information_model, &mutations);
    }

    #[test]
    fn test_each_required_field_flips_validity() {
        let mutations: [(&str, fn(&mut Platform)); 6] = [
            ("name missing", |p| p.name = None),
            ("name empty", |p| p.name = Some(String::new())),
            ("description empty", |p| p.description.clear()),
            ("services empty", |p| p.interworking_services.clear()),
            ("service url empty", |p| p.interworking_services[0].url = Some(String::new())),
            ("service model missing", |p| p.interworking_services[0].information_model_id = None),
        ];

        for (label, mutate) in mutations {
            let mut platform = complete_platform();
            mutate(&mut platform);
            assert!(!validate(&platform), "{label} should invalidate the platform");
            assert!(ensure_complete(&platform).is_err());
        }
    }

    #[test]
    fn test_optional_fields_do_not_matter() {
        let mut platform = complete_platform();
        platform.enabler = true;
        platform.id = None;
        assert!(validate(&platform));
    }

    #[test]
    fn test_ensure_complete_message() {
        let err = ensure_complete(&Platform::default()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "platform is incomplete: missing name, description, interworkingServices"
        );

        let err = ensure_complete(&SmartSpace::default()).unwrap_err();
        assert!(err.to_string().starts_with("smart space is incomplete"));
    }
}
