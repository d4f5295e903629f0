use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;

use crate::deeplink::DeeplinkCache;
use crate::error::LinkrunnerError;
use crate::fingerprint::{DeviceFingerprint, DeviceFingerprintCollector};
use crate::identity::IdentityManager;
use crate::primitives::capabilities::UrlOpener;
use crate::primitives::config::{LinkrunnerConfig, PACKAGE_VERSION};
use crate::primitives::http_client::HttpClient;
use crate::primitives::key_value_store::DeviceKeyValueStore;
use crate::{error, info, linkrunner_export, warn};

mod api;
/// Request inputs and response views of the client operations.
pub mod types;

use api::{
    ApiClient, CAPTURE_EVENT_PATH, CAPTURE_PAYMENT_PATH, DEEPLINK_TRIGGERED_PATH, INIT_PATH,
    REMOVE_PAYMENT_PATH, SET_USER_DATA_PATH, TRIGGER_PATH,
};
use types::{
    AttributeValue, Attributes, CapturePaymentRequest, InitOptions, InitResponse, InitSource,
    PaymentStatus, PaymentType, RemovePaymentRequest, TriggerResponse, UserData,
};

#[derive(Serialize)]
struct InitPayload<'a> {
    token: &'a str,
    package_version: &'a str,
    app_version: String,
    device_data: DeviceFingerprint,
    platform: &'a str,
    source: InitSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
    install_instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<bool>,
}

#[derive(Serialize)]
struct SignupData {
    #[serde(flatten)]
    extra: Attributes,
    device_data: DeviceFingerprint,
}

#[derive(Serialize)]
struct SignupPayload<'a> {
    token: &'a str,
    user_data: &'a UserData,
    platform: &'a str,
    data: SignupData,
    install_instance_id: String,
}

#[derive(Serialize)]
struct SetUserDataPayload<'a> {
    token: &'a str,
    user_data: &'a UserData,
    device_data: DeviceFingerprint,
    install_instance_id: String,
}

#[derive(Serialize)]
struct DeviceDataWrapper {
    device_data: DeviceFingerprint,
}

#[derive(Serialize)]
struct CapturePaymentPayload<'a> {
    token: &'a str,
    user_id: &'a str,
    platform: &'a str,
    data: DeviceDataWrapper,
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    payment_type: Option<PaymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<PaymentStatus>,
    install_instance_id: String,
}

#[derive(Serialize)]
struct RemovePaymentPayload<'a> {
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    platform: &'a str,
    data: DeviceDataWrapper,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<&'a str>,
    install_instance_id: String,
}

#[derive(Serialize)]
struct CaptureEventPayload<'a> {
    token: &'a str,
    event_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_data: Option<&'a Attributes>,
    device_data: DeviceFingerprint,
    install_instance_id: String,
}

#[derive(Serialize)]
struct DeeplinkTriggeredPayload {
    token: Option<String>,
}

/// The attribution client handed to the host application.
///
/// Construct one per app process and keep it for the app's lifetime. `init` must be called
/// before any tracking operation; until then they fail with
/// [`LinkrunnerError::TokenNotInitialized`] without touching the network.
///
/// Every operation collects a fresh device fingerprint and reads the install instance id
/// before issuing a single `POST`. Failures are logged and returned, never retried.
///
/// # Examples
///
/// ## Kotlin
///
/// ```kotlin
/// val client = LinkrunnerClient(
///     LinkrunnerConfig(debug = BuildConfig.DEBUG),
///     SharedPreferencesStore(context),
///     OkHttpTransport(),
///     DeviceFingerprintCollector(device, application, network, PlatformCapabilities.android(ids)),
///     IntentUrlOpener(context),
/// )
/// client.init("project-token", null)
/// ```
#[derive(uniffi::Object)]
pub struct LinkrunnerClient {
    config: Arc<LinkrunnerConfig>,
    api: ApiClient,
    identity: IdentityManager,
    deeplinks: DeeplinkCache,
    fingerprint: Arc<DeviceFingerprintCollector>,
    url_opener: Arc<dyn UrlOpener>,
    token: RwLock<Option<String>>,
}

#[linkrunner_export]
impl LinkrunnerClient {
    /// Creates an uninitialized client over the host's collaborators.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(
        config: Arc<LinkrunnerConfig>,
        store: Arc<dyn DeviceKeyValueStore>,
        http_client: Arc<dyn HttpClient>,
        fingerprint: Arc<DeviceFingerprintCollector>,
        url_opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            api: ApiClient::new(config.base_url(), http_client),
            identity: IdentityManager::new(store.clone()),
            deeplinks: DeeplinkCache::new(store),
            config,
            fingerprint,
            url_opener,
            token: RwLock::new(None),
        }
    }

    /// Whether `init` has been called with a token.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.current_token().is_some()
    }

    /// The install instance id, created on first use.
    #[must_use]
    pub fn install_instance_id(&self) -> String {
        self.identity.get_or_create_install_instance_id()
    }

    /// Registers the install with the backend and stores the project token.
    ///
    /// The token is kept as soon as this is called, even if the request then fails, so later
    /// calls can proceed. A deeplink in the response is cached for [`Self::trigger_deeplink`].
    ///
    /// # Errors
    /// - `LinkrunnerError::Validation` if `token` is empty; no request is sent
    /// - `LinkrunnerError::Http`, `Rejected` or `MalformedResponse` if the request fails
    pub async fn init(
        &self,
        token: String,
        options: Option<InitOptions>,
    ) -> Result<InitResponse, LinkrunnerError> {
        if token.is_empty() {
            let e = LinkrunnerError::validation("project token is required to initialize");
            error!("Linkrunner needs your project token to initialize: {e}");
            return Err(e);
        }

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        let result = self.send_init(&token, options.unwrap_or_default()).await;
        if let Ok(response) = &result {
            if self.config.debug() {
                info!("Linkrunner initialised successfully 🔥");
                info!("init response > {}", response.raw_json);
            }
        }
        Self::log_failure("Initialization", result)
    }

    /// Reports a signup of `user_data`, with optional caller data attached next to the
    /// device fingerprint.
    ///
    /// # Errors
    /// - `LinkrunnerError::TokenNotInitialized` before `init`
    /// - `LinkrunnerError::Http`, `Rejected` or `MalformedResponse` if the request fails
    pub async fn signup(
        &self,
        user_data: UserData,
        data: Option<HashMap<String, AttributeValue>>,
    ) -> Result<TriggerResponse, LinkrunnerError> {
        let result = self.send_signup(&user_data, data.unwrap_or_default()).await;
        if result.is_ok() && self.config.debug() {
            info!("Linkrunner: Signup called 🔥");
        }
        Self::log_failure("Signup", result)
    }

    /// Updates the backend's record of the current user.
    ///
    /// Returns the response `data` object serialized as JSON, if any.
    ///
    /// # Errors
    /// - `LinkrunnerError::TokenNotInitialized` before `init`
    /// - `LinkrunnerError::Http`, `Rejected` or `MalformedResponse` if the request fails
    pub async fn set_user_data(
        &self,
        user_data: UserData,
    ) -> Result<Option<String>, LinkrunnerError> {
        let result = async {
            let token = self.require_token()?;
            let payload = SetUserDataPayload {
                token: &token,
                user_data: &user_data,
                device_data: self.fingerprint.collect().await,
                install_instance_id: self.identity.get_or_create_install_instance_id(),
            };
            let data = self.api.post(SET_USER_DATA_PATH, &payload).await?;
            Ok::<_, LinkrunnerError>(data.map(|data| data.to_string()))
        }
        .await;
        Self::log_failure("Set user data", result)
    }

    /// Reports a payment.
    ///
    /// # Errors
    /// - `LinkrunnerError::TokenNotInitialized` before `init`
    /// - `LinkrunnerError::Http`, `Rejected` or `MalformedResponse` if the request fails
    pub async fn capture_payment(
        &self,
        request: CapturePaymentRequest,
    ) -> Result<(), LinkrunnerError> {
        let result = async {
            let token = self.require_token()?;
            let payload = CapturePaymentPayload {
                token: &token,
                user_id: &request.user_id,
                platform: self.config.platform_tag_str(),
                data: DeviceDataWrapper {
                    device_data: self.fingerprint.collect().await,
                },
                amount: request.amount,
                payment_id: request.payment_id.as_deref(),
                payment_type: request.payment_type,
                status: request.status,
                install_instance_id: self.identity.get_or_create_install_instance_id(),
            };
            self.api.post(CAPTURE_PAYMENT_PATH, &payload).await?;
            Ok::<_, LinkrunnerError>(())
        }
        .await;

        if result.is_ok() && self.config.debug() {
            info!(
                "Linkrunner: Payment captured successfully 💸 amount={} payment_id={:?} user_id={} type={} status={}",
                request.amount,
                request.payment_id,
                request.user_id,
                request.payment_type.map_or_else(|| "-".to_string(), |t| t.to_string()),
                request.status.map_or_else(|| "-".to_string(), |s| s.to_string()),
            );
        }
        Self::log_failure("Capture payment", result)
    }

    /// Removes captured payments by user id and/or payment id.
    ///
    /// # Errors
    /// - `LinkrunnerError::TokenNotInitialized` before `init`
    /// - `LinkrunnerError::Validation` if neither id is given; no request is sent
    /// - `LinkrunnerError::Http`, `Rejected` or `MalformedResponse` if the request fails
    pub async fn remove_payment(
        &self,
        request: RemovePaymentRequest,
    ) -> Result<(), LinkrunnerError> {
        let user_id = request.user_id.as_deref().filter(|id| !id.is_empty());
        let payment_id = request.payment_id.as_deref().filter(|id| !id.is_empty());

        let result = async {
            let token = self.require_token()?;
            if user_id.is_none() && payment_id.is_none() {
                return Err(LinkrunnerError::validation(
                    "either payment_id or user_id must be provided",
                ));
            }
            let payload = RemovePaymentPayload {
                token: &token,
                user_id,
                platform: self.config.platform_tag_str(),
                data: DeviceDataWrapper {
                    device_data: self.fingerprint.collect().await,
                },
                payment_id,
                install_instance_id: self.identity.get_or_create_install_instance_id(),
            };
            self.api.post(REMOVE_PAYMENT_PATH, &payload).await?;
            Ok(())
        }
        .await;

        if result.is_ok() && self.config.debug() {
            info!(
                "Linkrunner: Payment entry removed successfully! payment_id={payment_id:?} user_id={user_id:?}"
            );
        }
        Self::log_failure("Remove payment", result)
    }

    /// Records a custom event.
    ///
    /// Returns the response `data` object serialized as JSON, if any.
    ///
    /// # Errors
    /// - `LinkrunnerError::TokenNotInitialized` before `init`
    /// - `LinkrunnerError::Validation` if `event_name` is empty; no request is sent
    /// - `LinkrunnerError::Http`, `Rejected` or `MalformedResponse` if the request fails
    pub async fn track_event(
        &self,
        event_name: String,
        event_data: Option<HashMap<String, AttributeValue>>,
    ) -> Result<Option<String>, LinkrunnerError> {
        let result = async {
            let token = self.require_token()?;
            if event_name.is_empty() {
                return Err(LinkrunnerError::validation("event name is required"));
            }
            let payload = CaptureEventPayload {
                token: &token,
                event_name: &event_name,
                event_data: event_data.as_ref(),
                device_data: self.fingerprint.collect().await,
                install_instance_id: self.identity.get_or_create_install_instance_id(),
            };
            let data = self.api.post(CAPTURE_EVENT_PATH, &payload).await?;
            Ok::<_, LinkrunnerError>(data.map(|data| data.to_string()))
        }
        .await;

        if result.is_ok() && self.config.debug() {
            info!("Linkrunner: Tracking event {event_name} {event_data:?}");
        }
        Self::log_failure("Track event", result)
    }

    /// Opens the cached deeplink, then notifies the backend that it was triggered.
    ///
    /// The notification is best effort: its failure is logged and does not affect the result,
    /// since navigation already happened. The cached deeplink is kept.
    ///
    /// # Errors
    /// - `LinkrunnerError::DeeplinkNotFound` if no deeplink is cached
    /// - `LinkrunnerError::UrlOpenFailed` if the platform cannot open it; no notification is sent
    pub async fn trigger_deeplink(&self) -> Result<(), LinkrunnerError> {
        let Some(url) = self.deeplinks.get() else {
            return Self::log_failure("Trigger deeplink", Err(LinkrunnerError::DeeplinkNotFound));
        };

        if let Err(e) = self.url_opener.open_url(url.clone()).await {
            return Self::log_failure(
                "Trigger deeplink",
                Err(LinkrunnerError::UrlOpenFailed {
                    message: e.to_string(),
                }),
            );
        }

        let payload = DeeplinkTriggeredPayload {
            token: self.current_token(),
        };
        match self.api.post(DEEPLINK_TRIGGERED_PATH, &payload).await {
            Ok(_) => {
                if self.config.debug() {
                    info!("Linkrunner: Deeplink triggered successfully {url}");
                }
            }
            Err(e) => warn!("Linkrunner: Deeplink triggering failed {url}: {e}"),
        }

        Ok(())
    }
}

impl LinkrunnerClient {
    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_token(&self) -> Result<String, LinkrunnerError> {
        self.current_token()
            .ok_or(LinkrunnerError::TokenNotInitialized)
    }

    fn log_failure<T>(
        operation: &str,
        result: Result<T, LinkrunnerError>,
    ) -> Result<T, LinkrunnerError> {
        if let Err(e) = &result {
            error!("Linkrunner: {operation} failed: {e}");
        }
        result
    }

    async fn send_init(
        &self,
        token: &str,
        options: InitOptions,
    ) -> Result<InitResponse, LinkrunnerError> {
        let payload = InitPayload {
            token,
            package_version: PACKAGE_VERSION,
            app_version: self.fingerprint.app_version(),
            device_data: self.fingerprint.collect().await,
            platform: self.config.platform_tag_str(),
            source: options.source,
            link: options.link.as_deref(),
            install_instance_id: self.identity.get_or_create_install_instance_id(),
            debug: options.debug,
        };

        let data = self.api.post(INIT_PATH, &payload).await?;
        let data = data.filter(|data| !data.is_null());

        if let Some(deeplink) = data
            .as_ref()
            .and_then(|data| data.get("deeplink"))
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty())
        {
            self.deeplinks.set(deeplink);
        }

        Ok(data
            .as_ref()
            .map_or_else(InitResponse::default, InitResponse::from_data))
    }

    async fn send_signup(
        &self,
        user_data: &UserData,
        mut extra: Attributes,
    ) -> Result<TriggerResponse, LinkrunnerError> {
        let token = self.require_token()?;

        // The fingerprint always wins over caller data under the same key.
        extra.remove("device_data");

        let payload = SignupPayload {
            token: &token,
            user_data,
            platform: self.config.platform_tag_str(),
            data: SignupData {
                extra,
                device_data: self.fingerprint.collect().await,
            },
            install_instance_id: self.identity.get_or_create_install_instance_id(),
        };

        let data = self.api.post(TRIGGER_PATH, &payload).await?;
        Ok(data
            .filter(|data| !data.is_null())
            .as_ref()
            .map_or_else(TriggerResponse::default, TriggerResponse::from_data))
    }
}
