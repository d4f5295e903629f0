use thiserror::Error;

/// Errors that can occur when interacting with the device key-value store
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Error, uniffi::Error)]
pub enum KeyValueStoreError {
    /// The requested key was not found in the store
    #[error("key not found")]
    KeyNotFound,
    /// Failed to parse the value retrieved from the store
    #[error("failed to parse value")]
    ParsingFailure,
    /// Failed to update the value in the store
    #[error("failed to update value")]
    UpdateFailure,
    /// An unexpected error occurred in the foreign callback
    #[error("unexpected error in foreign callback: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for KeyValueStoreError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(e.reason)
    }
}

/// Persistent string store provided by the host app, surviving restarts and app updates.
///
/// Android backs it with `SharedPreferences` and iOS with `UserDefaults`. The SDK only ever
/// touches two keys: the install instance id and the cached deeplink URL.
///
/// A missing key must be reported as [`KeyValueStoreError::KeyNotFound`]; any other error is
/// treated as a failure of the store itself.
#[uniffi::export(with_foreign)]
pub trait DeviceKeyValueStore: Send + Sync {
    /// Get a value from the key-value store
    ///
    /// # Errors
    /// - `KeyValueStoreError::KeyNotFound` if the key is not found
    /// - `KeyValueStoreError::ParsingFailure` if something goes wrong while parsing the value
    fn get(&self, key: String) -> Result<String, KeyValueStoreError>;

    /// Set a value in the key-value store
    ///
    /// # Errors
    /// - `KeyValueStoreError::UpdateFailure` if something goes wrong while updating the value
    fn set(&self, key: String, value: String) -> Result<(), KeyValueStoreError>;
}

/// Read helper that folds [`KeyValueStoreError::KeyNotFound`] into `Ok(None)`.
pub(crate) fn get_optional(
    store: &dyn DeviceKeyValueStore,
    key: &str,
) -> Result<Option<String>, KeyValueStoreError> {
    match store.get(key.to_string()) {
        Ok(value) => Ok(Some(value)),
        Err(KeyValueStoreError::KeyNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
