//! Request pipeline
//!
//! Every (entity type, operation) pair gets its own request queue and
//! consumer. A delivery moves through decode, validate, authorize, persist,
//! reply and notify; any failure short-circuits into a reply carrying the
//! matching status code.

pub mod bindings;
pub mod consumer;
pub mod operation;
pub mod response;

pub use bindings::{build_bindings, ConsumerBinding};
pub use consumer::RequestConsumer;
pub use operation::Operation;
pub use response::{RegistryResponse, INTERNAL_ERROR_MESSAGE};
