//! Session bootstrap: the bearer token is the only credential the frontend knows about.

use secrecy::{ExposeSecret, SecretString};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// Persistent storage for the bearer token (local storage in the browser).
pub trait CredentialStore {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// An authenticated session. There is no refresh and no expiry handling: a rejected token shows
/// up as a `401` status like any other failed request.
#[derive(Debug)]
pub struct Session {
    token: SecretString,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

/// Reads the stored credential. Pages that require a session redirect to the login route when
/// this fails, and do nothing else.
pub fn bootstrap(store: &dyn CredentialStore) -> Result<Session> {
    match store.load() {
        Some(token) if !token.trim().is_empty() => Ok(Session::new(token)),
        _ => {
            log::info!("No stored credential, login required");
            Err(ClientError::MissingCredential)
        }
    }
}

/// Exchanges the user's credentials for a token and stores it.
pub async fn login<T: Transport>(
    client: &ApiClient<T>,
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<Session> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ClientError::InvalidDraft("email and password are required"));
    }
    let response = client.login(email.trim(), password).await?;
    store.store(&response.token)?;
    log::info!("Logged in as {}", response.user.email);
    Ok(Session::new(response.token))
}

pub fn logout(store: &dyn CredentialStore) -> Result<()> {
    store.clear()
}
