use std::sync::Arc;

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::error;
use crate::primitives::key_value_store::{get_optional, DeviceKeyValueStore};

/// Store key of the install instance id.
pub const INSTALL_INSTANCE_ID_KEY: &str = "linkrunner_install_instance_id";

/// Returned in place of an id when the store cannot be read or written.
pub const INSTALL_INSTANCE_ID_ERROR: &str = "ERROR_GENERATING_INSTALL_INSTANCE_ID";

const INSTALL_INSTANCE_ID_LENGTH: usize = 20;

/// Owns the random per-install identifier.
///
/// The id is generated the first time it is requested and read back from the store ever
/// after. Two concurrent first calls may both generate; the last write wins.
pub struct IdentityManager {
    store: Arc<dyn DeviceKeyValueStore>,
}

impl IdentityManager {
    /// Creates a manager over the host store.
    #[must_use]
    pub fn new(store: Arc<dyn DeviceKeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted install instance id, creating it on first use.
    ///
    /// Never fails: store errors are logged and [`INSTALL_INSTANCE_ID_ERROR`] is returned.
    #[must_use]
    pub fn get_or_create_install_instance_id(&self) -> String {
        match get_optional(self.store.as_ref(), INSTALL_INSTANCE_ID_KEY) {
            Ok(Some(id)) => id,
            Ok(None) => {
                let id = generate_install_instance_id();
                match self.store.set(INSTALL_INSTANCE_ID_KEY.to_string(), id.clone()) {
                    Ok(()) => id,
                    Err(e) => {
                        error!("Error persisting install instance id: {e}");
                        INSTALL_INSTANCE_ID_ERROR.to_string()
                    }
                }
            }
            Err(e) => {
                error!("Error reading install instance id: {e}");
                INSTALL_INSTANCE_ID_ERROR.to_string()
            }
        }
    }
}

fn generate_install_instance_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(INSTALL_INSTANCE_ID_LENGTH)
        .map(char::from)
        .collect()
}
