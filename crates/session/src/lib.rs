//! `crewdeck-session` — the client-side authentication session manager.
//!
//! The authoritative credential state lives in a single [`state::Session`]
//! record published through a `tokio::sync::watch` channel: UI layers are
//! read-only observers, and every mutation goes through a
//! [`manager::SessionManager`] operation. Tokens and the cached profile are
//! mirrored into a [`store::CredentialStore`] so the session survives
//! process restarts, and outgoing API calls run through a request pipeline
//! that attaches the access token and reacts to 401s with a single-flight
//! refresh.

pub mod manager;
pub mod pipeline;
pub mod state;
pub mod store;

pub use manager::SessionManager;
pub use state::{Session, SessionStatus};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredentials};
