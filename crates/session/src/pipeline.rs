//! Request interceptor pipeline.
//!
//! Two ordered stages wrap every outgoing authenticated request:
//! 1. attach `Bearer <access token>` when the request carries no explicit
//!    Authorization header;
//! 2. observe the response: 2xx refreshes the activity timestamp, a 401
//!    (with a refresh token in hand) funnels into the single-flight refresh
//!    and the original request is retried once with the rotated token.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, RequestBuilder, Response, StatusCode};

use crewdeck_auth::SessionError;

use crate::manager::SessionManager;

impl SessionManager {
    /// Run a request through the interceptor pipeline.
    ///
    /// A 401 without a refresh token, on a request that carried its own
    /// Authorization header, or on a request whose body cannot be replayed,
    /// is returned to the caller as-is. A 401 surviving the
    /// retry is also returned as-is; refresh failure propagates
    /// `RefreshExhausted` (the forced logout has already happened).
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, SessionError> {
        let mut request = builder
            .build()
            .map_err(|e| SessionError::network(e.to_string()))?;

        // Attach stage: no-op when the caller supplied its own header.
        let mut attached = false;
        if !request.headers().contains_key(AUTHORIZATION) {
            if let Some(token) = self.snapshot().access_token {
                request
                    .headers_mut()
                    .insert(AUTHORIZATION, bearer(&token)?);
                attached = true;
            }
        }

        let retry = request.try_clone();
        let response = self.send(request).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            if response.status().is_success() {
                self.touch();
            }
            return Ok(response);
        }

        // Reactive-refresh stage: only for requests authenticated with the
        // session's own token, and only with a refresh token in hand.
        if !attached || self.snapshot().refresh_token.is_none() {
            return Ok(response);
        }
        let Some(mut retry) = retry else {
            tracing::debug!("401 on a non-replayable request; skipping refresh retry");
            return Ok(response);
        };

        self.refresh().await?;

        let Some(token) = self.snapshot().access_token else {
            // Refresh resolved but the session ended underneath us.
            return Err(SessionError::Unauthorized);
        };
        retry.headers_mut().insert(AUTHORIZATION, bearer(&token)?);

        let response = self.send(retry).await?;
        if response.status().is_success() {
            self.touch();
        }
        Ok(response)
    }

    async fn send(&self, request: Request) -> Result<Response, SessionError> {
        self.api()
            .http()
            .execute(request)
            .await
            .map_err(|e| SessionError::network(e.to_string()))
    }
}

fn bearer(token: &str) -> Result<HeaderValue, SessionError> {
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| SessionError::validation("access token is not a valid header value"))
}
