//! Session lifecycle: login, logout, registration, email verification,
//! password reset.

use serde::{Deserialize, Serialize};

use super::{
    BingoClient, CONFIRM_EMAIL_PATH, CURRENT_USER_PATH, REGISTER_PATH,
    REQUEST_PASSWORD_RESET_PATH, REQUEST_VERIFICATION_PATH, RESET_PASSWORD_PATH, TOKEN_PATH,
};
use crate::error::Error;
use crate::store::CredentialStore;
use crate::types::{NewUser, UserId, UserProfile};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Token pair issued by `POST /token/`.
#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordRequest<'a> {
    user_id: UserId,
    token: &'a str,
    password: &'a str,
}

impl<S: CredentialStore> BingoClient<S> {
    /// Log in with username and password.
    ///
    /// Obtains a token pair, fetches the user's profile with the fresh
    /// access token, and stores all three in one atomic write. The token
    /// endpoints bypass the renewal pipeline: a 401 here means bad
    /// credentials, not an expired session.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] on rejected credentials, [`Error::Http`] on
    /// transport failure, [`Error::Store`] if the triple cannot be saved.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, Error> {
        let tokens: TokenPair = self
            .send(
                "login",
                self.http
                    .post(self.url(TOKEN_PATH))
                    .json(&LoginRequest { username, password }),
            )
            .await?;

        let profile: UserProfile = self
            .send(
                "fetch current user",
                self.http
                    .get(self.url(CURRENT_USER_PATH))
                    .bearer_auth(&tokens.access),
            )
            .await?;

        self.store
            .set(profile.clone(), tokens.access, tokens.refresh)
            .map_err(|e| Error::Store(e.to_string()))?;

        tracing::info!(user = %profile.user_name, "login successful");
        Ok(profile)
    }

    /// Log out locally. Idempotent; the server holds no session state for
    /// stateless token auth, so there is nothing to call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the credential store cannot be cleared.
    pub fn logout(&self) -> Result<(), Error> {
        self.store.clear().map_err(|e| Error::Store(e.to_string()))
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Field errors come back as [`Error::Validation`]; they never affect
    /// an existing session.
    pub async fn register(&self, new_user: &NewUser) -> Result<(), Error> {
        self.send_no_content(
            "register",
            self.http.post(self.url(REGISTER_PATH)).json(new_user),
        )
        .await
    }

    /// Ask the server to send a verification email.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an unknown or already-verified address.
    pub async fn request_email_verification(&self, email: &str) -> Result<(), Error> {
        self.send_no_content(
            "request email verification",
            self.http
                .post(self.url(REQUEST_VERIFICATION_PATH))
                .json(&EmailRequest { email }),
        )
        .await
    }

    /// Confirm an email address with the token from the verification link.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] with status 404 for an invalid token.
    pub async fn confirm_email(&self, user_id: UserId, token: &str) -> Result<(), Error> {
        self.send_no_content(
            "confirm email",
            self.http
                .get(self.url(CONFIRM_EMAIL_PATH))
                .query(&[("user_id", user_id.to_string()), ("token", token.to_string())]),
        )
        .await
    }

    /// Ask the server to send a password reset email.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an unknown address.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), Error> {
        self.send_no_content(
            "request password reset",
            self.http
                .post(self.url(REQUEST_PASSWORD_RESET_PATH))
                .json(&EmailRequest { email }),
        )
        .await
    }

    /// Set a new password using the token from the reset link.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a missing field or rejected password.
    pub async fn reset_password(
        &self,
        user_id: UserId,
        token: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        self.send_no_content(
            "reset password",
            self.http
                .post(self.url(RESET_PASSWORD_PATH))
                .json(&ResetPasswordRequest {
                    user_id,
                    token,
                    password: new_password,
                }),
        )
        .await
    }
}
