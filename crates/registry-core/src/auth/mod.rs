//! Authorization of platform-owned writes
//!
//! Bearer tokens are parsed into [`TokenClaims`], checked against the target
//! platform by the [`AuthorizationGate`], and finally confirmed by a
//! [`TokenAuthority`] that verifies the signature.

pub mod authority;
pub mod claims;
pub mod gate;

pub use authority::{JwtTokenAuthority, TokenAuthority, TokenVerdict};
pub use claims::{IssuerType, TokenClaims, OWNED_PLATFORM_ATTRIBUTE, PLATFORM_OWNER_ROLE, ROLE_ATTRIBUTE};
pub use gate::{AccessDecision, AuthorizationGate, DenyReason};
