//! Registry Core
//!
//! Entity lifecycle management for the registry: platforms, resources, smart
//! spaces, devices and information models are created, modified, removed and
//! looked up through request queues, with change notifications broadcast
//! after every committed write.
//!
//! - **entity**: entity types and their wire format
//! - **validation**: completeness checks
//! - **auth**: bearer token authorization for platform-owned writes
//! - **store**: MongoDB and in-memory repositories
//! - **pipeline**: per-queue request consumers
//! - **notification**: change broadcasts

pub mod auth;
pub mod entity;
pub mod notification;
pub mod pipeline;
pub mod shared;
pub mod store;
pub mod validation;

pub use auth::{AccessDecision, AuthorizationGate, DenyReason, JwtTokenAuthority, TokenAuthority, TokenClaims};
pub use entity::{
    Device, EntityKind, InformationModel, InterworkingService, Platform, RegistryEntity, Resource,
    ResourceType, SmartSpace,
};
pub use notification::{NotificationPublisher, OperationType};
pub use pipeline::{build_bindings, ConsumerBinding, Operation, RequestConsumer};
pub use shared::error::{RegistryError, Result};
pub use store::{initialize_indexes, EntityStore, MemoryStore, MongoStore, PersistenceResult, RegistryStores};
