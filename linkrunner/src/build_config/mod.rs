//! Build-time patches that prepare a host app's native projects for the SDK.
//!
//! Host build tooling hands over a [`BuildDescriptor`] and writes back what
//! [`with_linkrunner`] returns. Every patch checks for its entry first, so applying the
//! configuration again leaves the descriptor unchanged.

use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::AnyhowErrorExt;
use crate::primitives::logger::LogContext;
use crate::{debug, info};

mod android;
mod ios;

pub use android::{GradleBuildScript, GradleDialect};
pub use ios::{PluginEntry, TRACKING_TRANSPARENCY_PLUGIN, USER_TRACKING_USAGE_DESCRIPTION_KEY};

/// Maven repository the Android SDK artifact is published to.
pub const LINKRUNNER_MAVEN_REPOSITORY: &str = "https://jitpack.io";

/// Tracking prompt used when the configuration does not provide one.
pub const DEFAULT_USER_TRACKING_PERMISSION: &str =
    "This identifier will be used to deliver personalized ads to you.";

/// Options of the build configuration step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct LinkrunnerConfiguration {
    /// Log each applied patch
    #[serde(default)]
    pub debug: Option<bool>,
    /// Custom App Tracking Transparency prompt for iOS
    #[serde(default)]
    pub user_tracking_permission: Option<String>,
}

/// The parts of a host app's build configuration the SDK patches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    /// Android project-level build script, absent for iOS-only apps
    #[serde(default)]
    pub android_build_script: Option<GradleBuildScript>,
    /// String entries of the iOS Info.plist
    #[serde(default)]
    pub ios_info_plist: HashMap<String, String>,
    /// Build plugins attached to the app
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

/// Errors of the JSON entry point of the build configuration step.
#[crate::linkrunner_error]
pub enum BuildConfigError {
    /// The descriptor could not be read or written as JSON
    #[error("invalid build descriptor: {message}")]
    InvalidDescriptor {
        /// Parse failure with its context chain
        message: String,
    },
}

/// Applies the Android and iOS patches to `descriptor`.
///
/// - Android: registers [`LINKRUNNER_MAVEN_REPOSITORY`] under `allprojects { repositories }`
/// - iOS: sets `NSUserTrackingUsageDescription` and attaches the tracking transparency plugin
///   with the same prompt
#[uniffi::export]
#[must_use]
pub fn with_linkrunner(
    descriptor: BuildDescriptor,
    configuration: LinkrunnerConfiguration,
) -> BuildDescriptor {
    let _ctx = LogContext::new("BuildConfig");
    let verbose = configuration.debug.unwrap_or(false);
    if verbose {
        info!("Applying plugin configuration");
    }

    let mut descriptor = descriptor;
    let description = configuration
        .user_tracking_permission
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_TRACKING_PERMISSION.to_string());

    if let Some(script) = descriptor.android_build_script.as_mut() {
        match android::add_maven_repository(script) {
            Some(patched) => {
                script.contents = patched;
                if verbose {
                    info!("Added {LINKRUNNER_MAVEN_REPOSITORY} to the Android build script");
                }
            }
            None => debug!("Android build script already lists {LINKRUNNER_MAVEN_REPOSITORY}"),
        }
    }

    if ios::ensure_tracking_description(&mut descriptor.ios_info_plist, &description) && verbose {
        info!("iOS Info.plist configured successfully");
    }
    if ios::ensure_tracking_plugin(&mut descriptor.plugins, &description) && verbose {
        info!("Attached {TRACKING_TRANSPARENCY_PLUGIN}");
    }

    descriptor
}

/// [`with_linkrunner`] over a JSON-encoded [`BuildDescriptor`], for build tooling that
/// exchanges descriptors as JSON.
///
/// # Errors
/// - `BuildConfigError::InvalidDescriptor` if `descriptor_json` is not a valid descriptor
#[uniffi::export]
pub fn with_linkrunner_json(
    descriptor_json: &str,
    configuration: LinkrunnerConfiguration,
) -> Result<String, BuildConfigError> {
    let descriptor: BuildDescriptor = serde_json::from_str(descriptor_json)
        .context("failed to parse build descriptor")
        .map_err(|e| BuildConfigError::InvalidDescriptor {
            message: e.to_generic_message(),
        })?;

    let patched = with_linkrunner(descriptor, configuration);

    Ok(serde_json::to_string(&patched).context("failed to serialize build descriptor")?)
}
