//! Backend API client for the auth endpoints.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crewdeck_auth::UserProfile;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::types::{
    AuthResponse, ErrorBody, LoginRequest, ProfileUpdate, RefreshRequest, RegisterRequest,
    TokenPair,
};

/// Thin typed client over the backend's `/auth/*` contract.
///
/// Cheap to clone; the underlying `reqwest::Client` is a shared handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.base_url,
        }
    }

    /// Shared HTTP handle, for callers that execute pre-built requests
    /// (the session request pipeline).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Builder for an arbitrary API-relative request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .request(Method::POST, "/auth/login")
            .json(req)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .request(Method::POST, "/auth/register")
            .json(req)
            .send()
            .await?;
        decode(resp).await
    }

    /// Remote logout. Failures are reported but callers are expected to
    /// tolerate them; local teardown never depends on this call.
    pub async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        let resp = self
            .request(Method::POST, "/auth/logout")
            .bearer_auth(access_token)
            .send()
            .await?;
        expect_success(resp).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let req = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let resp = self
            .request(Method::POST, "/auth/refresh")
            .json(&req)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn profile(&self, access_token: &str) -> Result<UserProfile, ApiError> {
        let resp = self
            .request(Method::GET, "/auth/profile")
            .bearer_auth(access_token)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn update_profile(
        &self,
        access_token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let resp = self
            .request(Method::PUT, "/auth/profile")
            .bearer_auth(access_token)
            .json(update)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let resp = check_status(resp).await?;
    resp.json::<T>().await.map_err(ApiError::from)
}

async fn expect_success(resp: Response) -> Result<(), ApiError> {
    check_status(resp).await.map(|_| ())
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
