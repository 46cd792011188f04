use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::entity::RegistryEntity;
use crate::shared::error::Result;
use crate::store::PersistenceResult;

/// Reply message for infrastructure failures; the detail stays in the logs
pub const INTERNAL_ERROR_MESSAGE: &str = "internal registry error";

/// Reply payload: `{status, message, <entityField>?}`
#[derive(Debug)]
pub struct RegistryResponse<'a, E> {
    status: u16,
    message: &'a str,
    entity: Option<&'a E>,
}

impl<'a, E: RegistryEntity> RegistryResponse<'a, E> {
    pub fn from_result(result: &'a PersistenceResult<E>) -> Self {
        let message = if result.status() >= 500 {
            INTERNAL_ERROR_MESSAGE
        } else {
            result.message()
        };
        Self {
            status: result.status(),
            message,
            entity: result.entity(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<E: RegistryEntity> Serialize for RegistryResponse<'_, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.entity.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("message", self.message)?;
        if let Some(entity) = self.entity {
            map.serialize_entry(E::KIND.response_field(), entity)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SmartSpace;
    use crate::shared::error::RegistryError;
    use serde_json::Value;

    #[test]
    fn test_success_response_uses_entity_field() {
        let space = SmartSpace {
            id: Some("S1".to_string()),
            ..Default::default()
        };
        let result = PersistenceResult::success(space, "smart space created");
        let body: Value = serde_json::from_slice(&RegistryResponse::from_result(&result).to_bytes().unwrap()).unwrap();

        assert_eq!(body["status"], 200);
        assert_eq!(body["message"], "smart space created");
        assert_eq!(body["smartSpace"]["id"], "S1");
    }

    #[test]
    fn test_failure_response_has_no_entity() {
        let result: PersistenceResult<SmartSpace> = RegistryError::not_found("smart space", "S9").into();
        let body: Value = serde_json::from_slice(&RegistryResponse::from_result(&result).to_bytes().unwrap()).unwrap();

        assert_eq!(body["status"], 404);
        assert!(body.get("smartSpace").is_none());
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let result: PersistenceResult<SmartSpace> =
            RegistryError::store("connection refused by 10.0.0.7:27017").into();
        let body: Value = serde_json::from_slice(&RegistryResponse::from_result(&result).to_bytes().unwrap()).unwrap();

        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
        assert!(result.message().contains("10.0.0.7"));
    }
}
