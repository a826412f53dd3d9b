//! `crewdeck-client` — typed wire contract for the crewdeck backend.
//!
//! The backend is consumed, never implemented, here: request/response DTOs
//! for the `/auth/*` endpoints, a thin `ApiClient` over `reqwest`, and a
//! structured error mapping (401 is a typed variant, never a string match).

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use types::{
    AuthResponse, LoginRequest, ProfileUpdate, RefreshRequest, RegisterRequest, TokenPair,
};
