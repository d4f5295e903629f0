#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

//! `linkrunner` is the mobile attribution SDK for apps that use Linkrunner
//! It reports installs, signups, payments and custom events with a device fingerprint, and
//! hands deferred deeplinks back to the app.
//!
//! More info about Linkrunner can be found here: <https://www.linkrunner.io>

/// Introduces the attribution client that talks to the Linkrunner backend.
pub mod client;

/// Introduces low level primitives: host capabilities, HTTP, storage, configuration and logging.
pub mod primitives;

/// Introduces the error type shared by every client operation.
pub mod error;

/// Introduces device fingerprint collection.
pub mod fingerprint;

/// Introduces the persistent install instance id.
pub mod identity;

/// Introduces the cache of the server-assigned deferred deeplink.
pub mod deeplink;

/// Introduces the build-time patches for the host app's native projects.
pub mod build_config;

#[cfg(test)]
mod test_utils;

pub use client::LinkrunnerClient;
pub use error::LinkrunnerError;
pub use linkrunner_macros::{linkrunner_error, linkrunner_export};

uniffi::setup_scaffolding!("linkrunner");
