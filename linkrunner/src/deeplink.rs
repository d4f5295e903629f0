use std::sync::Arc;

use crate::error;
use crate::primitives::key_value_store::{get_optional, DeviceKeyValueStore};

/// Store key of the cached deferred deeplink.
pub const DEEPLINK_URL_KEY: &str = "linkrunner_deeplink_url";

/// Last deeplink assigned by the backend, kept for a later manual trigger.
///
/// The value is overwritten by every init response carrying a deeplink and is never cleared,
/// so it can be triggered again.
pub struct DeeplinkCache {
    store: Arc<dyn DeviceKeyValueStore>,
}

impl DeeplinkCache {
    /// Creates a cache over the host store.
    #[must_use]
    pub fn new(store: Arc<dyn DeviceKeyValueStore>) -> Self {
        Self { store }
    }

    /// Stores `url`. A failing store is logged and otherwise ignored.
    pub fn set(&self, url: &str) {
        if let Err(e) = self.store.set(DEEPLINK_URL_KEY.to_string(), url.to_string()) {
            error!("Error setting deeplink URL: {e}");
        }
    }

    /// Returns the cached URL, or `None` when nothing is cached or the store fails.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        get_optional(self.store.as_ref(), DEEPLINK_URL_KEY).unwrap_or_else(|e| {
            error!("Error getting deeplink URL: {e}");
            None
        })
    }
}
