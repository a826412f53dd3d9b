//! `crewdeck-auth` — pure authentication/authorization building blocks.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! inspection, permission/role membership, profile display derivations and
//! credential validation are all deterministic functions over plain data.

pub mod error;
pub mod permissions;
pub mod predicates;
pub mod profile;
pub mod roles;
pub mod token;
pub mod validate;

pub use error::SessionError;
pub use permissions::Permission;
pub use profile::UserProfile;
pub use roles::Role;
pub use token::{INACTIVITY_WINDOW, TokenClaims};
