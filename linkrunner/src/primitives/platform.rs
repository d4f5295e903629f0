use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fingerprint::fetch_or_default;
use crate::primitives::capabilities::{
    AndroidIdentifiers, CapabilityError, IosIdentifiers, TrackingPermissionStatus,
    TrackingTransparency,
};
use crate::{debug, error, linkrunner_export};

/// Platform enum as reported by clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
pub enum PlatformKind {
    /// Android platform
    #[serde(rename = "android")]
    Android,
    /// iOS platform
    #[serde(rename = "ios")]
    Ios,
}

impl PlatformKind {
    #[must_use]
    /// Returns the lowercase string representation for wire format
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

/// Platform-specific identifiers that end up in the device fingerprint.
///
/// Fields that do not exist on the running platform stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformIdentifiers {
    /// `ANDROID_ID` (Android)
    pub android_id: Option<String>,
    /// Google advertising id (Android)
    pub gaid: Option<String>,
    /// Advertising identifier, gated by tracking permission (iOS)
    pub idfa: Option<String>,
    /// Identifier for vendor (iOS)
    pub idfv: Option<String>,
    /// Play Store install referrer (Android)
    pub install_ref: Option<String>,
}

/// Reads the identifiers of one platform.
#[async_trait::async_trait]
trait PlatformIdentifierSource: Send + Sync {
    async fn collect(&self) -> PlatformIdentifiers;
}

struct AndroidSource {
    identifiers: Arc<dyn AndroidIdentifiers>,
}

#[async_trait::async_trait]
impl PlatformIdentifierSource for AndroidSource {
    async fn collect(&self) -> PlatformIdentifiers {
        PlatformIdentifiers {
            android_id: fetch_or_default("android_id", self.identifiers.android_id()).await,
            gaid: fetch_or_default("gaid", self.identifiers.advertising_id()).await,
            install_ref: fetch_or_default("install_ref", self.identifiers.install_referrer())
                .await,
            ..PlatformIdentifiers::default()
        }
    }
}

struct IosSource {
    identifiers: Arc<dyn IosIdentifiers>,
    tracking: Arc<dyn TrackingTransparency>,
}

#[async_trait::async_trait]
impl PlatformIdentifierSource for IosSource {
    async fn collect(&self) -> PlatformIdentifiers {
        let idfa = match gated_advertising_id(self.tracking.as_ref()).await {
            Ok(idfa) => idfa,
            Err(e) => {
                error!("Error getting advertising identifier: {e}");
                None
            }
        };

        PlatformIdentifiers {
            idfa,
            idfv: fetch_or_default("idfv", self.identifiers.identifier_for_vendor()).await,
            ..PlatformIdentifiers::default()
        }
    }
}

struct GenericSource;

#[async_trait::async_trait]
impl PlatformIdentifierSource for GenericSource {
    async fn collect(&self) -> PlatformIdentifiers {
        PlatformIdentifiers::default()
    }
}

/// Reads the IDFA only when App Tracking Transparency allows it.
///
/// Undecided users are prompted once per call; the answer is not remembered by the SDK.
async fn gated_advertising_id(
    tracking: &dyn TrackingTransparency,
) -> Result<Option<String>, CapabilityError> {
    if !tracking.is_available().await? {
        return Ok(None);
    }

    let status = match tracking.permission_status().await? {
        TrackingPermissionStatus::Granted => TrackingPermissionStatus::Granted,
        _ => tracking.request_permission().await?,
    };

    if status == TrackingPermissionStatus::Granted {
        tracking.advertising_id().await
    } else {
        Ok(None)
    }
}

/// Platform capability provider, selected once at startup by the host.
///
/// The fingerprint collector only talks to this object; it never inspects which platform it
/// is running on.
#[derive(uniffi::Object)]
pub struct PlatformCapabilities {
    kind: Option<PlatformKind>,
    source: Box<dyn PlatformIdentifierSource>,
}

#[linkrunner_export]
impl PlatformCapabilities {
    /// Provider for Android hosts.
    #[uniffi::constructor]
    #[must_use]
    pub fn android(identifiers: Arc<dyn AndroidIdentifiers>) -> Self {
        Self {
            kind: Some(PlatformKind::Android),
            source: Box::new(AndroidSource { identifiers }),
        }
    }

    /// Provider for iOS hosts.
    #[uniffi::constructor]
    #[must_use]
    pub fn ios(
        identifiers: Arc<dyn IosIdentifiers>,
        tracking: Arc<dyn TrackingTransparency>,
    ) -> Self {
        Self {
            kind: Some(PlatformKind::Ios),
            source: Box::new(IosSource {
                identifiers,
                tracking,
            }),
        }
    }

    /// Provider for hosts without platform identifiers; every platform field is `null`.
    #[uniffi::constructor]
    #[must_use]
    pub fn generic() -> Self {
        Self {
            kind: None,
            source: Box::new(GenericSource),
        }
    }

    /// The platform this provider was built for, if any.
    #[must_use]
    pub fn kind(&self) -> Option<PlatformKind> {
        self.kind
    }
}

impl PlatformCapabilities {
    /// Collects the identifiers of the selected platform. Never fails.
    pub async fn identifiers(&self) -> PlatformIdentifiers {
        debug!(
            "Collecting {} identifiers",
            self.kind.map_or("generic", |kind| kind.as_str())
        );
        self.source.collect().await
    }
}
