//! Session operations: the asynchronous state-transition functions.
//!
//! `SessionManager` is the single writer of the session record. Every
//! operation clears the previous error on entry, applies its transition as
//! one atomic `watch` publish, and mirrors credential changes into the
//! store in the same logical step. Refreshes are single-flight: concurrent
//! 401 observers share one in-flight rotation per credential generation,
//! and a logout always wins over a refresh racing it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::watch;

use crewdeck_auth::{Permission, Role, SessionError, UserProfile, token, validate};
use crewdeck_client::{
    ApiClient, ApiError, AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, TokenPair,
};

use crate::state::{Session, SessionStatus};
use crate::store::{CredentialStore, StoredCredentials};

type RefreshFuture = Shared<BoxFuture<'static, Result<TokenPair, SessionError>>>;

struct Inner {
    state: watch::Sender<Session>,
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    /// Bumped on logout and forced logout; a refresh started under an older
    /// generation must discard its result.
    generation: AtomicU64,
    refresh_flight: tokio::sync::Mutex<Option<RefreshFuture>>,
}

/// Owner of the session state machine.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Fresh anonymous session.
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Inner {
                state,
                api,
                store,
                generation: AtomicU64::new(0),
                refresh_flight: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Seed the session from the credential store.
    ///
    /// The session starts authenticated only when the store holds a
    /// non-expired access token together with a cached profile; anything
    /// else (absent, expired, partial) seeds anonymous.
    pub async fn restore(api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        let manager = Self::new(api, store);

        match manager.inner.store.load().await {
            Ok(credentials) => {
                let seed = seed_session(credentials);
                if seed.is_authenticated() {
                    tracing::info!("restored authenticated session from credential store");
                    manager.inner.state.send_replace(seed);
                }
            }
            Err(err) => {
                tracing::warn!("failed to read credential store, starting anonymous: {err}");
            }
        }

        manager
    }

    // ─── Read access ─────────────────────────────────────────────────────────

    /// Subscribe to session snapshots. Readers never observe a partially
    /// applied transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        if !validate::validate_email(email) {
            return self.fail_validation("invalid email address");
        }
        if password.is_empty() {
            return self.fail_validation("password must not be empty");
        }
        if self.snapshot().is_authenticated() {
            return self.fail_validation("already authenticated; log out first");
        }

        self.begin(SessionStatus::Authenticating);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.inner.api.login(&request).await {
            Ok(response) => self.commit_authenticated(response).await,
            Err(err) => {
                let err = credential_error(err);
                tracing::debug!("login failed: {err}");
                self.inner.state.send_modify(|s| {
                    s.status = SessionStatus::Anonymous;
                    s.error = Some(err.clone());
                });
                Err(err)
            }
        }
    }

    /// Same shape as login, with credential strength enforced up front.
    pub async fn register(&self, request: RegisterRequest) -> Result<(), SessionError> {
        if !validate::validate_email(&request.email) {
            return self.fail_validation("invalid email address");
        }
        let password = validate::validate_password(&request.password);
        if !password.is_valid() {
            return self.fail_validation(password.errors.join("; "));
        }
        if self.snapshot().is_authenticated() {
            return self.fail_validation("already authenticated; log out first");
        }

        self.begin(SessionStatus::Authenticating);

        match self.inner.api.register(&request).await {
            Ok(response) => self.commit_authenticated(response).await,
            Err(err) => {
                let err = credential_error(err);
                tracing::debug!("registration failed: {err}");
                self.inner.state.send_modify(|s| {
                    s.status = SessionStatus::Anonymous;
                    s.error = Some(err.clone());
                });
                Err(err)
            }
        }
    }

    /// Tear down the session. Always succeeds locally: the remote logout
    /// call is best-effort and its failure is logged, never surfaced.
    pub async fn logout(&self) {
        // Logout wins every race: bump the generation first so an in-flight
        // refresh completing after this point is discarded.
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        let access_token = self.inner.state.borrow().access_token.clone();

        self.inner.state.send_replace(Session::default());

        if let Err(err) = self.inner.store.clear().await {
            tracing::warn!("failed to clear credential store on logout: {err}");
        }

        if let Some(token) = access_token {
            if let Err(err) = self.inner.api.logout(&token).await {
                tracing::warn!("remote logout failed (ignored): {err}");
            }
        }
    }

    /// Rotate the token pair.
    ///
    /// Concurrent callers within one credential generation share a single
    /// in-flight rotation; all of them observe the same outcome. Any
    /// rotation failure forcibly terminates the session
    /// (`SessionError::RefreshExhausted`).
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let shared = self.refresh_shared().await?;
        shared.await.map(|_| ())
    }

    async fn refresh_shared(&self) -> Result<RefreshFuture, SessionError> {
        let mut flight = self.inner.refresh_flight.lock().await;

        if let Some(existing) = flight.as_ref() {
            tracing::debug!("refresh already in flight; awaiting shared result");
            return Ok(existing.clone());
        }

        let Some(refresh_token) = self.inner.state.borrow().refresh_token.clone() else {
            return Err(SessionError::RefreshExhausted);
        };
        let generation = self.inner.generation.load(Ordering::SeqCst);

        let manager = self.clone();
        let shared: RefreshFuture = async move {
            let result = manager.run_refresh(generation, refresh_token).await;
            // Release the slot; the next 401 starts a fresh rotation.
            *manager.inner.refresh_flight.lock().await = None;
            result
        }
        .boxed()
        .shared();

        *flight = Some(shared.clone());
        Ok(shared)
    }

    async fn run_refresh(
        &self,
        generation: u64,
        refresh_token: String,
    ) -> Result<TokenPair, SessionError> {
        self.inner.state.send_modify(|s| {
            if s.status == SessionStatus::Authenticated {
                s.status = SessionStatus::Refreshing;
                s.error = None;
            }
        });

        let outcome = self.inner.api.refresh(&refresh_token).await;

        if self.inner.generation.load(Ordering::SeqCst) != generation {
            // A logout won the race; nothing from this rotation may
            // resurrect the session.
            tracing::debug!("discarding refresh outcome from a stale credential generation");
            return Err(SessionError::Unauthorized);
        }

        match outcome {
            Ok(pair) => {
                self.inner.state.send_modify(|s| {
                    s.status = SessionStatus::Authenticated;
                    s.access_token = Some(pair.access_token.clone());
                    s.refresh_token = Some(pair.refresh_token.clone());
                    s.last_activity = Some(Utc::now());
                    s.error = None;
                });
                self.persist().await?;
                Ok(pair)
            }
            Err(err) => {
                tracing::warn!("token refresh rejected, terminating session: {err}");
                self.inner.generation.fetch_add(1, Ordering::SeqCst);
                self.inner.state.send_replace(Session {
                    error: Some(SessionError::RefreshExhausted),
                    ..Session::default()
                });
                if let Err(err) = self.inner.store.clear().await {
                    tracing::warn!("failed to clear credential store after forced logout: {err}");
                }
                Err(SessionError::RefreshExhausted)
            }
        }
    }

    /// Re-fetch the profile. Does not change `status`; on failure the prior
    /// profile stays in place and only `error` is set.
    pub async fn fetch_profile(&self) -> Result<UserProfile, SessionError> {
        self.inner.state.send_modify(|s| s.error = None);

        let Some(access_token) = self.inner.state.borrow().access_token.clone() else {
            return self.fail_unauthorized();
        };

        match self.inner.api.profile(&access_token).await {
            Ok(user) => {
                self.inner.state.send_modify(|s| {
                    s.user = Some(user.clone());
                    s.last_activity = Some(Utc::now());
                });
                self.persist().await?;
                Ok(user)
            }
            Err(err) => {
                let err = api_error(err);
                self.inner.state.send_modify(|s| s.error = Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Push a partial profile update to the backend and adopt its response.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, SessionError> {
        self.inner.state.send_modify(|s| s.error = None);

        let Some(access_token) = self.inner.state.borrow().access_token.clone() else {
            return self.fail_unauthorized();
        };

        match self.inner.api.update_profile(&access_token, update).await {
            Ok(user) => {
                self.inner.state.send_modify(|s| {
                    s.user = Some(user.clone());
                    s.last_activity = Some(Utc::now());
                });
                self.persist().await?;
                Ok(user)
            }
            Err(err) => {
                let err = api_error(err);
                self.inner.state.send_modify(|s| s.error = Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Merge a profile update locally, without a network round trip.
    /// No-op when anonymous.
    pub fn apply_profile_update(&self, update: &ProfileUpdate) {
        self.inner.state.send_modify(|s| {
            if let Some(user) = &s.user {
                s.user = Some(update.apply_to(user));
            }
        });
    }

    pub fn clear_error(&self) {
        self.inner.state.send_modify(|s| s.error = None);
    }

    /// Record activity on a completed authenticated call.
    pub(crate) fn touch(&self) {
        self.inner.state.send_modify(|s| {
            if s.is_authenticated() {
                s.last_activity = Some(Utc::now());
            }
        });
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn begin(&self, status: SessionStatus) {
        self.inner.state.send_modify(|s| {
            s.status = status;
            s.error = None;
        });
    }

    fn fail_validation(&self, msg: impl Into<String>) -> Result<(), SessionError> {
        let err = SessionError::validation(msg);
        self.inner.state.send_modify(|s| s.error = Some(err.clone()));
        Err(err)
    }

    fn fail_unauthorized<T>(&self) -> Result<T, SessionError> {
        self.inner
            .state
            .send_modify(|s| s.error = Some(SessionError::Unauthorized));
        Err(SessionError::Unauthorized)
    }

    async fn commit_authenticated(&self, response: AuthResponse) -> Result<(), SessionError> {
        let next = Session {
            status: SessionStatus::Authenticated,
            user: Some(response.user),
            access_token: Some(response.access_token),
            refresh_token: Some(response.refresh_token),
            permissions: response.permissions.into_iter().map(Permission::from).collect(),
            roles: response.roles.into_iter().map(Role::from).collect(),
            last_activity: Some(Utc::now()),
            error: None,
        };
        debug_assert!(next.invariants_hold());

        self.inner.state.send_replace(next);
        self.persist().await
    }

    /// Write-through of the current credential fields.
    ///
    /// The in-memory transition is kept even when the write fails: dropping
    /// live credentials over a persistence hiccup would log the user out for
    /// no reason. The failure is still surfaced as the session error.
    ///
    /// Generation-guarded: a logout landing while the save is in flight has
    /// already cleared the store, and the save would write the dead
    /// credentials back. The re-check after the await catches that and
    /// re-clears.
    async fn persist(&self) -> Result<(), SessionError> {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let credentials = self.inner.state.borrow().credentials();

        if let Err(err) = self.inner.store.save(&credentials).await {
            tracing::error!("failed to persist credentials: {err}");
            let err = SessionError::Store(err.to_string());
            self.inner.state.send_modify(|s| s.error = Some(err.clone()));
            return Err(err);
        }

        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("logout raced a credential write-through; re-clearing the store");
            if let Err(err) = self.inner.store.clear().await {
                tracing::warn!("failed to re-clear credential store: {err}");
            }
            return Err(SessionError::Unauthorized);
        }

        Ok(())
    }
}

fn seed_session(credentials: StoredCredentials) -> Session {
    let StoredCredentials {
        access_token: Some(access_token),
        refresh_token,
        user: Some(user),
    } = credentials
    else {
        return Session::default();
    };

    if token::is_expired(&access_token) {
        tracing::debug!("stored access token is expired; seeding anonymous");
        return Session::default();
    }

    Session {
        status: SessionStatus::Authenticated,
        user: Some(user),
        access_token: Some(access_token),
        refresh_token,
        last_activity: Some(Utc::now()),
        ..Session::default()
    }
}

/// Error mapping for login/register: a rejected credential is an
/// authentication failure, everything else keeps its class.
fn credential_error(err: ApiError) -> SessionError {
    match err {
        ApiError::Unauthorized => SessionError::Authentication("invalid credentials".to_string()),
        ApiError::Status { status, message } if (400..500).contains(&status) => {
            SessionError::Authentication(message)
        }
        ApiError::Status { status, message } => {
            SessionError::Network(format!("server error ({status}): {message}"))
        }
        ApiError::Network(msg) | ApiError::Decode(msg) => SessionError::Network(msg),
    }
}

/// Error mapping for authenticated calls (profile fetch/update).
fn api_error(err: ApiError) -> SessionError {
    match err {
        ApiError::Unauthorized => SessionError::Unauthorized,
        ApiError::Status { status, message } => {
            SessionError::Network(format!("api error ({status}): {message}"))
        }
        ApiError::Network(msg) | ApiError::Decode(msg) => SessionError::Network(msg),
    }
}
