use crate::linkrunner_export;

/// Production attribution backend.
pub const DEFAULT_BASE_URL: &str = "https://api.linkrunner.io";

/// Platform tag reported to the backend by this SDK flavor.
pub const DEFAULT_PLATFORM_TAG: &str = "EXPO";

/// SDK version sent as `package_version` on init.
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration handed to [`crate::LinkrunnerClient`] at construction.
///
/// There is no global configuration; each client owns its own copy.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct LinkrunnerConfig {
    base_url: String,
    platform_tag: String,
    debug: bool,
}

#[linkrunner_export]
impl LinkrunnerConfig {
    /// Creates a configuration pointing at the production backend.
    ///
    /// # Arguments
    /// * `debug` - Logs successful calls and their responses at info level
    ///
    /// # Examples
    ///
    /// ## Swift
    ///
    /// ```swift
    /// let config = LinkrunnerConfig(debug: true)
    /// ```
    #[uniffi::constructor]
    #[must_use]
    pub fn new(debug: bool) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            platform_tag: DEFAULT_PLATFORM_TAG.to_string(),
            debug,
        }
    }

    /// Creates a configuration with a custom backend and platform tag, e.g. for a staging backend.
    ///
    /// A trailing `/` on `base_url` is dropped.
    #[uniffi::constructor]
    #[must_use]
    pub fn custom(base_url: String, platform_tag: String, debug: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            platform_tag,
            debug,
        }
    }

    /// Base URL of the attribution backend, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    /// Platform tag sent in request payloads.
    #[must_use]
    pub fn platform_tag(&self) -> String {
        self.platform_tag.clone()
    }

    /// Whether successful calls are logged.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl LinkrunnerConfig {
    pub(crate) fn platform_tag_str(&self) -> &str {
        &self.platform_tag
    }
}

impl Default for LinkrunnerConfig {
    fn default() -> Self {
        Self::new(false)
    }
}
