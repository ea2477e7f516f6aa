//! The authenticated request pipeline and the token renewal protocol.
//!
//! Every authorized call runs through [`BingoClient::send_authorized`]:
//! the bearer credential is attached when one is held, and a 401 response
//! triggers at most one refresh exchange followed by at most one replay of
//! the original request. A failed exchange tears the session down. Worst
//! case per originating call: the original request, one refresh exchange,
//! one replay.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{BingoClient, TOKEN_REFRESH_PATH};
use crate::error::Error;
use crate::store::CredentialStore;

/// Per-request renewal state, threaded through one logical
/// request/replay pair. Immutable: marking consumes and returns.
///
/// Bounds every originating request to a single refresh exchange no
/// matter how often the server keeps answering 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryContext {
    already_refreshed: bool,
}

impl RetryContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn already_refreshed(self) -> bool {
        self.already_refreshed
    }

    #[must_use]
    pub fn mark_refreshed(self) -> Self {
        Self {
            already_refreshed: true,
        }
    }
}

/// Result of one refresh exchange. There is no retry within the
/// protocol: one exchange per triggering request, then renewed or done.
enum RefreshOutcome {
    Renewed(String),
    Failed { detail: String },
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
}

impl<S: CredentialStore> BingoClient<S> {
    /// Run an authorized request through the renewal pipeline and decode
    /// the successful body.
    ///
    /// `build` constructs the request; it is called again for the replay
    /// so the retried request is fresh rather than a mutated original.
    pub(crate) async fn send_authorized<T, F>(
        &self,
        operation: &'static str,
        build: F,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let response = self.run_pipeline(operation, &build).await?;
        response.json::<T>().await.map_err(Into::into)
    }

    /// Pipeline variant for endpoints whose success body carries nothing
    /// the client needs.
    pub(crate) async fn send_authorized_no_content<F>(
        &self,
        operation: &'static str,
        build: F,
    ) -> Result<(), Error>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        self.run_pipeline(operation, &build).await.map(drop)
    }

    async fn run_pipeline<F>(
        &self,
        operation: &'static str,
        build: &F,
    ) -> Result<reqwest::Response, Error>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut ctx = RetryContext::new();
        loop {
            let result = self.attempt(operation, build).await;

            // Only an unrenewed 401 is eligible for the refresh protocol;
            // everything else propagates unchanged.
            let original_detail = match &result {
                Err(Error::Unauthorized { detail, .. }) if !ctx.already_refreshed() => {
                    detail.clone()
                }
                _ => return result,
            };

            let record = self.store.get();
            let Some(refresh_token) = record.refresh_token().map(ToOwned::to_owned) else {
                return result;
            };

            ctx = ctx.mark_refreshed();
            match self.exchange_refresh_token(&refresh_token).await {
                RefreshOutcome::Renewed(access) => {
                    self.store_renewed_access(access)?;
                    tracing::debug!(operation, "access token renewed, replaying request");
                }
                RefreshOutcome::Failed { detail } => {
                    tracing::warn!(operation, error = %detail, "token renewal failed, ending session");
                    if let Err(e) = self.store.clear() {
                        // Don't mask the session expiry with a storage error.
                        tracing::error!(error = %e, "failed to clear credential store after renewal failure");
                    }
                    return Err(Error::SessionExpired {
                        operation,
                        detail: original_detail,
                    });
                }
            }
        }
    }

    /// One attempt: attach the bearer token iff one is held, send,
    /// classify the status.
    async fn attempt<F>(
        &self,
        operation: &'static str,
        build: &F,
    ) -> Result<reqwest::Response, Error>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let record = self.store.get();
        let mut request = build(&self.http);
        if let Some(token) = record.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(Error::from_response(operation, status.as_u16(), detail))
    }

    /// One refresh exchange: the refresh token goes in the body, never a
    /// header. Anything but a 2xx with a non-empty `access` field fails.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> RefreshOutcome {
        let request = self
            .http
            .post(self.url(TOKEN_REFRESH_PATH))
            .json(&RefreshRequest {
                refresh: refresh_token,
            });

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return RefreshOutcome::Failed {
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return RefreshOutcome::Failed {
                detail: format!("refresh endpoint returned {}: {body}", status.as_u16()),
            };
        }

        match response.json::<RefreshResponse>().await {
            Ok(RefreshResponse {
                access: Some(access),
            }) if !access.is_empty() => RefreshOutcome::Renewed(access),
            Ok(_) => RefreshOutcome::Failed {
                detail: "refresh exchange returned no usable access token".into(),
            },
            Err(e) => RefreshOutcome::Failed {
                detail: e.to_string(),
            },
        }
    }

    /// Swap in the renewed access token, preserving the rest of the
    /// triple. A concurrent logout between the 401 and the renewal leaves
    /// the store logged out — renewal never resurrects a session.
    fn store_renewed_access(&self, access_token: String) -> Result<(), Error> {
        match self.store.get().renewed(access_token).into_parts() {
            Some((profile, access, refresh)) => self
                .store
                .set(profile, access, refresh)
                .map_err(|e| Error::Store(e.to_string())),
            None => Ok(()),
        }
    }
}
