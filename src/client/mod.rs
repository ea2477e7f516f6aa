//! Typed client for the bingo API.
//!
//! All authorized operations run through the request pipeline in
//! [`pipeline`]: bearer injection, 401 classification, and single-shot
//! token renewal with replay. The token endpoints themselves and
//! anonymous calls bypass it.

mod auth;
mod bingo;
mod pipeline;
mod user;

pub use pipeline::RetryContext;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::Error;
use crate::session::Session;
use crate::store::CredentialStore;

pub(crate) const TOKEN_PATH: &str = "/token/";
pub(crate) const TOKEN_REFRESH_PATH: &str = "/token/refresh/";
pub(crate) const CURRENT_USER_PATH: &str = "/user/me/";
pub(crate) const REGISTER_PATH: &str = "/user/register/";
pub(crate) const UPDATE_PREFERENCES_PATH: &str = "/user/update/";
pub(crate) const USER_SEARCH_PATH: &str = "/user/search/";
pub(crate) const PROFILE_PATH: &str = "/profile/";
pub(crate) const BINGO_GRID_PATH: &str = "/bingo/";
pub(crate) const START_CHALLENGE_PATH: &str = "/challenge/start/";
pub(crate) const COMPLETE_CHALLENGE_PATH: &str = "/challenge/complete/";
pub(crate) const LEADERBOARD_PATH: &str = "/leaderboard/";
pub(crate) const REQUEST_VERIFICATION_PATH: &str = "/email/request-verification/";
pub(crate) const CONFIRM_EMAIL_PATH: &str = "/email/confirm/";
pub(crate) const REQUEST_PASSWORD_RESET_PATH: &str = "/password/request-reset/";
pub(crate) const RESET_PASSWORD_PATH: &str = "/password/reset/";

/// Bingo API client over a shared credential store.
///
/// The store is the single source of truth for "who is logged in": the
/// client writes it on [`login`](BingoClient::login) /
/// [`logout`](BingoClient::logout) and during token renewal, and reads it
/// on every outbound request.
pub struct BingoClient<S> {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ApiConfig,
    pub(crate) store: Arc<S>,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for BingoClient<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: CredentialStore> BingoClient<S> {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP transport cannot be built.
    pub fn new(config: ApiConfig, store: S) -> Result<Self, Error> {
        let http = config.build_http()?;
        Ok(Self {
            http,
            config,
            store: Arc::new(store),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// The shared credential store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// A session-state view over this client's store.
    #[must_use]
    pub fn session(&self) -> Session<S> {
        Session::new(self.store.clone())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Send a request outside the renewal pipeline and decode the body.
    ///
    /// Success decodes `T`; failure is classified by status. Used for the
    /// token endpoints themselves and for anonymous calls.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(Into::into);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(Error::from_response(operation, status.as_u16(), detail))
    }

    /// Like [`send`](Self::send), for endpoints whose success body carries
    /// nothing the client needs.
    pub(crate) async fn send_no_content(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), Error> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response.text().await.unwrap_or_default();
        Err(Error::from_response(operation, status.as_u16(), detail))
    }
}
