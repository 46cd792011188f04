//! Persistence Result
//!
//! Uniform envelope returned by store writes. A result is successful exactly
//! when it carries an entity: the constructors keep status 200 and a present
//! entity together, and every failure is built from a [`RegistryError`].

use crate::entity::RegistryEntity;
use crate::shared::error::RegistryError;

pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceResult<E> {
    status: u16,
    message: String,
    entity: Option<E>,
}

impl<E> PersistenceResult<E> {
    pub fn success(entity: E, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            message: message.into(),
            entity: Some(entity),
        }
    }

    pub fn failure(error: RegistryError) -> Self {
        Self {
            status: error.status_code(),
            message: error.to_string(),
            entity: None,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn entity(&self) -> Option<&E> {
        self.entity.as_ref()
    }

    pub fn into_entity(self) -> Option<E> {
        self.entity
    }
}

impl<E: RegistryEntity> PersistenceResult<E> {
    pub fn not_found(id: &str) -> Self {
        Self::failure(RegistryError::not_found(E::KIND.label(), id))
    }
}

impl<E> From<RegistryError> for PersistenceResult<E> {
    fn from(error: RegistryError) -> Self {
        Self::failure(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Device;

    #[test]
    fn test_success_carries_entity() {
        let result = PersistenceResult::success(Device::default(), "device created");
        assert_eq!(result.status(), 200);
        assert!(result.entity().is_some());
        assert_eq!(result.message(), "device created");
    }

    #[test]
    fn test_failures_never_carry_entity() {
        let errors = vec![
            RegistryError::decode("eof"),
            RegistryError::validation("device", vec!["name"]),
            RegistryError::forbidden("denied"),
            RegistryError::not_found("device", "D1"),
            RegistryError::store("timeout"),
        ];
        for error in errors {
            let status = error.status_code();
            let result: PersistenceResult<Device> = error.into();
            assert_eq!(result.status(), status);
            assert_ne!(result.status(), 200);
            assert!(result.entity().is_none());
        }
    }

    #[test]
    fn test_not_found_message() {
        let result = PersistenceResult::<Device>::not_found("D9");
        assert_eq!(result.status(), 404);
        assert_eq!(result.message(), "device not found: D9");
    }
}
