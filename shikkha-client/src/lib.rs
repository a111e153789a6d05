//! `shikkha-client` is the platform independent core of the Shikkha frontend.
//!
//! Everything that touches the browser (HTTP, local storage, the HLS library) sits behind a trait
//! defined here, and is implemented by `shikkha-site`:
//! - [`transport::Transport`] performs HTTP requests.
//! - [`session::CredentialStore`] persists the bearer token.
//! - [`playback::StreamingBackend`] binds an adaptive streaming session to the video element.
//!
//! On top of those seams this crate implements the typed API client, the session bootstrap and
//! the course player state machine, so that they can be tested on the host.

pub mod client;
pub mod config;
pub mod error;
pub mod notes;
pub mod playback;
pub mod player;
pub mod session;
pub mod syllabus;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
