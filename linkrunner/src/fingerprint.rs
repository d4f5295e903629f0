//! Best-effort device fingerprint, rebuilt for every outbound request.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::primitives::capabilities::{
    ApplicationInfo, CapabilityError, DeviceInfo, NetworkInfo, NetworkType,
};
use crate::primitives::platform::PlatformCapabilities;
use crate::{error, linkrunner_export, warn};

const COLLECTION_FAILED: &str = "Failed to collect device data";

/// Awaits one field read, degrading any failure to `None` with a warning.
pub(crate) async fn fetch_or_default<F>(field: &str, fetch: F) -> Option<String>
where
    F: Future<Output = Result<Option<String>, CapabilityError>>,
{
    match fetch.await {
        Ok(value) => value,
        Err(e) => {
            warn!("DeviceInfo error ({field}): {e}");
            None
        }
    }
}

/// Snapshot of device, app, network and identifier attributes.
///
/// Every field serializes, as `null` when unknown, so the backend always sees the full key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceData {
    /// Device brand
    pub brand: Option<String>,
    /// Model name
    pub device: Option<String>,
    /// Model identifier
    pub device_id: Option<String>,
    /// Form factor name, e.g. `PHONE`
    pub device_type: Option<String>,
    /// Manufacturer
    pub manufacturer: Option<String>,
    /// OS version
    pub system_version: Option<String>,
    /// User-assigned device name
    pub device_name: Option<String>,
    /// App display name
    pub application_name: Option<String>,
    /// App build number
    pub build_number: Option<String>,
    /// Bundle / application id
    pub bundle_id: Option<String>,
    /// App marketing version
    pub version: Option<String>,
    /// Device IP address
    pub device_ip: Option<String>,
    /// Network type name, e.g. `WIFI`
    pub connectivity: Option<String>,
    /// `"cellular"` when on a cellular network
    pub carrier: Option<String>,
    /// Android id
    pub android_id: Option<String>,
    /// iOS advertising identifier
    pub idfa: Option<String>,
    /// Google advertising id
    pub gaid: Option<String>,
    /// iOS identifier for vendor
    pub idfv: Option<String>,
    /// Android install referrer
    pub install_ref: Option<String>,
    /// Not collected; always `null`
    pub user_agent: Option<String>,
}

/// Result of a collection: the full snapshot, or a single error marker when the
/// network/device-type reads that everything else depends on failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeviceFingerprint {
    /// Collection went through; individual fields may still be `null`
    Collected(Box<DeviceData>),
    /// Collection aborted
    Unavailable {
        /// Human readable marker sent in place of the data
        error: String,
    },
}

impl DeviceFingerprint {
    /// The collected data, if collection went through.
    #[must_use]
    pub fn data(&self) -> Option<&DeviceData> {
        match self {
            Self::Collected(data) => Some(data),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Collects a [`DeviceFingerprint`] from the host capability providers.
#[derive(uniffi::Object)]
pub struct DeviceFingerprintCollector {
    device: Arc<dyn DeviceInfo>,
    application: Arc<dyn ApplicationInfo>,
    network: Arc<dyn NetworkInfo>,
    platform: Arc<PlatformCapabilities>,
}

#[linkrunner_export]
impl DeviceFingerprintCollector {
    /// Creates a collector over the given providers.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(
        device: Arc<dyn DeviceInfo>,
        application: Arc<dyn ApplicationInfo>,
        network: Arc<dyn NetworkInfo>,
        platform: Arc<PlatformCapabilities>,
    ) -> Self {
        Self {
            device,
            application,
            network,
            platform,
        }
    }
}

impl DeviceFingerprintCollector {
    /// Collects a fresh fingerprint. Never fails and never panics.
    pub async fn collect(&self) -> DeviceFingerprint {
        match self.collect_data().await {
            Ok(data) => DeviceFingerprint::Collected(Box::new(data)),
            Err(e) => {
                error!("Error collecting device data: {e}");
                DeviceFingerprint::Unavailable {
                    error: COLLECTION_FAILED.to_string(),
                }
            }
        }
    }

    /// App marketing version reported on init, empty when unknown.
    pub(crate) fn app_version(&self) -> String {
        self.application
            .application_version()
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn collect_data(&self) -> Result<DeviceData, CapabilityError> {
        // Independent reads; joined before the per-field reads below.
        let (network_state, device_type) =
            tokio::join!(self.network.network_state(), self.device.device_type());
        let network_state = network_state?;
        let device_type = device_type?;

        let device_ip = self.network.ip_address().await?;

        let device = &self.device;
        let application = &self.application;
        let identifiers = self.platform.identifiers().await;

        Ok(DeviceData {
            brand: fetch_or_default("brand", async { device.brand() }).await,
            device: fetch_or_default("device", async { device.model_name() }).await,
            device_id: fetch_or_default("device_id", async { device.model_id() }).await,
            device_type: Some(device_type.to_string()),
            manufacturer: fetch_or_default("manufacturer", async { device.manufacturer() }).await,
            system_version: fetch_or_default("system_version", async { device.os_version() })
                .await,
            device_name: fetch_or_default("device_name", async { device.device_name() }).await,
            application_name: fetch_or_default("application_name", async {
                application.application_name()
            })
            .await,
            build_number: fetch_or_default("build_number", async { application.build_version() })
                .await,
            bundle_id: fetch_or_default("bundle_id", async { application.application_id() })
                .await,
            version: fetch_or_default("version", async { application.application_version() })
                .await,
            device_ip: Some(device_ip),
            connectivity: Some(network_state.network_type.to_string()),
            carrier: (network_state.network_type == NetworkType::Cellular)
                .then(|| "cellular".to_string()),
            android_id: identifiers.android_id,
            idfa: identifiers.idfa,
            gaid: identifiers.gaid,
            idfv: identifiers.idfv,
            install_ref: identifiers.install_ref,
            user_agent: None,
        })
    }
}
