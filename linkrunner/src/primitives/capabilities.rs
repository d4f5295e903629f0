//! Platform services implemented by the host application (Swift/Kotlin).
//!
//! Each trait is a thin window onto one platform API. The SDK never assumes a read succeeds:
//! every call may fail with a [`CapabilityError`] and the caller decides how to degrade.

use serde::Serialize;
use thiserror::Error;

/// Errors reported by host capability callbacks
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Error, uniffi::Error)]
pub enum CapabilityError {
    /// The platform API does not exist on this device or OS version
    #[error("capability unavailable")]
    Unavailable,
    /// The platform API exists but the read failed
    #[error("capability failed: {message}")]
    Failed {
        /// Description of the failure from the host
        message: String,
    },
    /// An unexpected error occurred in the foreign callback
    #[error("unexpected error in foreign callback: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for CapabilityError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(e.reason)
    }
}

/// Physical form factor of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    /// Form factor could not be determined
    Unknown,
    /// Phone
    Phone,
    /// Tablet
    Tablet,
    /// Desktop or laptop
    Desktop,
    /// TV
    Tv,
}

/// Kind of network the device is currently using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkType {
    /// No active network
    None,
    /// Network type could not be determined
    Unknown,
    /// Cellular data
    Cellular,
    /// Wi-Fi
    Wifi,
    /// Bluetooth tethering
    Bluetooth,
    /// Wired ethernet
    Ethernet,
    /// WiMAX
    Wimax,
    /// VPN tunnel
    Vpn,
    /// Anything else
    Other,
}

/// Snapshot of the device network state.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NetworkState {
    /// Active network type
    pub network_type: NetworkType,
    /// Whether the device reports connectivity, when known
    pub is_connected: Option<bool>,
}

/// App Tracking Transparency authorization state (iOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TrackingPermissionStatus {
    /// The user has allowed tracking
    Granted,
    /// The user has refused tracking, or tracking is restricted
    Denied,
    /// The user has not been asked yet
    Undetermined,
}

/// Device model and OS lookups.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait DeviceInfo: Send + Sync {
    /// Consumer-visible brand, e.g. `Apple` or `google`.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn brand(&self) -> Result<Option<String>, CapabilityError>;

    /// Human readable model name, e.g. `iPhone 15 Pro`.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn model_name(&self) -> Result<Option<String>, CapabilityError>;

    /// Internal model identifier, e.g. `iPhone16,1`.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn model_id(&self) -> Result<Option<String>, CapabilityError>;

    /// Device manufacturer.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn manufacturer(&self) -> Result<Option<String>, CapabilityError>;

    /// OS version string.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn os_version(&self) -> Result<Option<String>, CapabilityError>;

    /// User-assigned device name.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn device_name(&self) -> Result<Option<String>, CapabilityError>;

    /// Form factor classification.
    ///
    /// # Errors
    /// `CapabilityError` if the classification fails.
    async fn device_type(&self) -> Result<DeviceType, CapabilityError>;
}

/// Identity and version of the host application.
#[uniffi::export(with_foreign)]
pub trait ApplicationInfo: Send + Sync {
    /// Display name of the app.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn application_name(&self) -> Result<Option<String>, CapabilityError>;

    /// Bundle identifier (iOS) or application id (Android).
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn application_id(&self) -> Result<Option<String>, CapabilityError>;

    /// Marketing version, e.g. `2.4.1`.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn application_version(&self) -> Result<Option<String>, CapabilityError>;

    /// Build number, e.g. `241`.
    ///
    /// # Errors
    /// `CapabilityError` if the value cannot be read.
    fn build_version(&self) -> Result<Option<String>, CapabilityError>;
}

/// Network state lookups.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait NetworkInfo: Send + Sync {
    /// Current network state.
    ///
    /// # Errors
    /// `CapabilityError` if the state cannot be read.
    async fn network_state(&self) -> Result<NetworkState, CapabilityError>;

    /// Current IP address of the device. May be a local address.
    ///
    /// # Errors
    /// `CapabilityError` if the address cannot be read.
    async fn ip_address(&self) -> Result<String, CapabilityError>;
}

/// Identifiers only available on Android.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait AndroidIdentifiers: Send + Sync {
    /// `Settings.Secure.ANDROID_ID`.
    ///
    /// # Errors
    /// `CapabilityError` if the id cannot be read.
    async fn android_id(&self) -> Result<Option<String>, CapabilityError>;

    /// Google advertising id (GAID).
    ///
    /// # Errors
    /// `CapabilityError` if the id cannot be read, e.g. without Play services.
    async fn advertising_id(&self) -> Result<Option<String>, CapabilityError>;

    /// Raw Play Store install referrer string.
    ///
    /// # Errors
    /// `CapabilityError` if the referrer client fails.
    async fn install_referrer(&self) -> Result<Option<String>, CapabilityError>;
}

/// Identifiers only available on iOS.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait IosIdentifiers: Send + Sync {
    /// `identifierForVendor` (IDFV).
    ///
    /// # Errors
    /// `CapabilityError` if the id cannot be read.
    async fn identifier_for_vendor(&self) -> Result<Option<String>, CapabilityError>;
}

/// App Tracking Transparency permission and advertising id (IDFA) access on iOS.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait TrackingTransparency: Send + Sync {
    /// Whether the tracking permission API exists on this OS version.
    ///
    /// # Errors
    /// `CapabilityError` if availability cannot be determined.
    async fn is_available(&self) -> Result<bool, CapabilityError>;

    /// Current permission status, without prompting.
    ///
    /// # Errors
    /// `CapabilityError` if the status cannot be read.
    async fn permission_status(&self) -> Result<TrackingPermissionStatus, CapabilityError>;

    /// Prompts the user (if undecided) and returns the resulting status.
    ///
    /// # Errors
    /// `CapabilityError` if the prompt cannot be shown.
    async fn request_permission(&self) -> Result<TrackingPermissionStatus, CapabilityError>;

    /// Advertising identifier (IDFA). Only called once permission is granted.
    ///
    /// # Errors
    /// `CapabilityError` if the id cannot be read.
    async fn advertising_id(&self) -> Result<Option<String>, CapabilityError>;
}

/// Opens URLs through the platform (deep links, universal links).
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait UrlOpener: Send + Sync {
    /// Opens `url` and resolves once the platform has handed it off.
    ///
    /// # Errors
    /// `CapabilityError` if the platform refuses to open the URL.
    async fn open_url(&self, url: String) -> Result<(), CapabilityError>;
}
