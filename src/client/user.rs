//! User profile and search endpoints. All authorized calls go through
//! the renewal pipeline.

use serde::Serialize;

use super::{
    BingoClient, CURRENT_USER_PATH, PROFILE_PATH, UPDATE_PREFERENCES_PATH, USER_SEARCH_PATH,
};
use crate::error::Error;
use crate::store::CredentialStore;
use crate::types::{ProfilePage, UpdatePreferences, UserProfile, UserSearchResult};

#[derive(Serialize)]
struct SearchRequest<'a> {
    query_string: &'a str,
}

impl<S: CredentialStore> BingoClient<S> {
    /// Fetch the logged-in user's profile.
    ///
    /// Returns the server's view without touching the stored profile —
    /// the credential triple only changes through login, logout and
    /// token renewal.
    ///
    /// # Errors
    ///
    /// [`Error::SessionExpired`] if the session could not be renewed.
    pub async fn current_user(&self) -> Result<UserProfile, Error> {
        self.send_authorized("fetch current user", |http| {
            http.get(self.url(CURRENT_USER_PATH))
        })
        .await
    }

    /// Update avatar, bio and visibility preferences.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for rejected values.
    pub async fn update_preferences(&self, preferences: &UpdatePreferences) -> Result<(), Error> {
        self.send_authorized_no_content("update preferences", |http| {
            http.put(self.url(UPDATE_PREFERENCES_PATH)).json(preferences)
        })
        .await
    }

    /// Search users by username prefix, with friendship status relative
    /// to the requester.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSearchResult>, Error> {
        self.send_authorized("search users", |http| {
            http.post(self.url(USER_SEARCH_PATH))
                .json(&SearchRequest {
                    query_string: query,
                })
        })
        .await
    }

    /// Fetch a user's profile page. Anonymous access is allowed; the
    /// server reports `permission: false` (with no challenges) when the
    /// target's visibility excludes the requester.
    pub async fn profile_page(&self, username: &str) -> Result<ProfilePage, Error> {
        let url = format!("{}{username}/", self.url(PROFILE_PATH));
        self.send_authorized("fetch profile page", |http| http.get(url.clone()))
            .await
    }
}
