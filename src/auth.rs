// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Bearer-token authentication for the Mastodon API.

use std::{env, fmt};
use thiserror::Error;

/// Holds the access token used to authenticate with a Mastodon instance.
///
/// The token is a secret: it is never logged, and the [`Debug`]
/// implementation redacts it.
#[derive(Clone)]
pub struct Auth {
    token: String,
}

impl Auth {
    /// Creates a new `Auth` structure using the given access token.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self { token }
    }

    /// Retrieves an access token from the environment.
    ///
    /// Returns an error if the variable is unset, is not valid Unicode,
    /// or is empty.
    pub fn from_env(envvar: impl AsRef<str>) -> AuthResult {
        let token = env::var(envvar.as_ref())?;
        if token.is_empty() {
            Err(AuthError::Empty)
        } else {
            Ok(Self { token })
        }
    }

    /// Value of the `Authorization` header sent with every request.
    ///
    /// # Examples
    ///
    /// ```
    /// use mastodon_scout::auth::Auth;
    /// let auth = Auth::new("ThisIsMyToken");
    /// assert_eq!(auth.bearer(), "Bearer ThisIsMyToken");
    /// ```
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth").field("token", &"<redacted>").finish()
    }
}

/// Standard result type for [`Auth`] creation.
pub type AuthResult = Result<Auth, AuthError>;

/// Indicates an error when reading an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a token from the environment.
    #[error("Environment error: {0}")]
    EnvError(#[from] env::VarError),

    /// The token was present but empty.
    #[error("Access token is empty")]
    Empty,
}
