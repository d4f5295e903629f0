#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use linkrunner::fingerprint::DeviceFingerprintCollector;
use linkrunner::primitives::capabilities::{
    AndroidIdentifiers, ApplicationInfo, CapabilityError, DeviceInfo, DeviceType,
    IosIdentifiers, NetworkInfo, NetworkState, NetworkType, TrackingPermissionStatus,
    TrackingTransparency, UrlOpener,
};
use linkrunner::primitives::config::LinkrunnerConfig;
use linkrunner::primitives::http_client::{HttpClient, HttpError, HttpHeader};
use linkrunner::primitives::key_value_store::{DeviceKeyValueStore, KeyValueStoreError};
use linkrunner::primitives::platform::PlatformCapabilities;
use linkrunner::LinkrunnerClient;

/// Stand-in for `SharedPreferences` / `UserDefaults`.
#[derive(Default)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl DeviceKeyValueStore for MemoryStore {
    fn get(&self, key: String) -> Result<String, KeyValueStoreError> {
        self.0
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(KeyValueStoreError::KeyNotFound)
    }

    fn set(&self, key: String, value: String) -> Result<(), KeyValueStoreError> {
        self.0.lock().unwrap().insert(key, value);
        Ok(())
    }
}

pub struct Exchange {
    pub url: String,
    pub headers: Vec<HttpHeader>,
    pub body: serde_json::Value,
}

/// Scripted backend: answers each path with the queued reply, `{"status":200}` otherwise.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<HashMap<String, Vec<Result<serde_json::Value, HttpError>>>>,
    log: Mutex<Vec<Exchange>>,
}

impl ScriptedBackend {
    pub fn reply(&self, path: &str, body: serde_json::Value) {
        self.push(path, Ok(body));
    }

    pub fn fail(&self, path: &str, error: HttpError) {
        self.push(path, Err(error));
    }

    fn push(&self, path: &str, reply: Result<serde_json::Value, HttpError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(reply);
    }

    pub fn paths(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|exchange| exchange.url.trim_start_matches(BASE_URL).to_string())
            .collect()
    }

    pub fn body_of(&self, path: &str) -> serde_json::Value {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|exchange| exchange.url.ends_with(path))
            .map(|exchange| exchange.body.clone())
            .unwrap_or_else(|| panic!("no request to {path}"))
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedBackend {
    async fn post(
        &self,
        url: String,
        headers: Vec<HttpHeader>,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, HttpError> {
        let path = url.trim_start_matches(BASE_URL).to_string();
        self.log.lock().unwrap().push(Exchange {
            url,
            headers,
            body: serde_json::from_slice(&body).unwrap(),
        });

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&path) {
                Some(queue) if !queue.is_empty() => queue.remove(0),
                _ => Ok(serde_json::json!({ "status": 200 })),
            }
        };
        reply.map(|body| serde_json::to_vec(&body).unwrap())
    }
}

pub struct Pixel;

#[async_trait::async_trait]
impl DeviceInfo for Pixel {
    fn brand(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("google".to_string()))
    }

    fn model_name(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Pixel 8".to_string()))
    }

    fn model_id(&self) -> Result<Option<String>, CapabilityError> {
        Err(CapabilityError::Unavailable)
    }

    fn manufacturer(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Google".to_string()))
    }

    fn os_version(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("14".to_string()))
    }

    fn device_name(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Ada's Pixel".to_string()))
    }

    async fn device_type(&self) -> Result<DeviceType, CapabilityError> {
        Ok(DeviceType::Phone)
    }
}

pub struct DemoApp;

impl ApplicationInfo for DemoApp {
    fn application_name(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Demo".to_string()))
    }

    fn application_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("io.linkrunner.demo".to_string()))
    }

    fn application_version(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("3.0.0".to_string()))
    }

    fn build_version(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("300".to_string()))
    }
}

pub struct Cellular;

#[async_trait::async_trait]
impl NetworkInfo for Cellular {
    async fn network_state(&self) -> Result<NetworkState, CapabilityError> {
        Ok(NetworkState {
            network_type: NetworkType::Cellular,
            is_connected: Some(true),
        })
    }

    async fn ip_address(&self) -> Result<String, CapabilityError> {
        Ok("100.64.0.9".to_string())
    }
}

pub struct PlayServices;

#[async_trait::async_trait]
impl AndroidIdentifiers for PlayServices {
    async fn android_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("a1b2c3".to_string()))
    }

    async fn advertising_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("38400000-8cf0-11bd-b23e-10b96e40000d".to_string()))
    }

    async fn install_referrer(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("utm_source=meta".to_string()))
    }
}

pub struct Vendor;

#[async_trait::async_trait]
impl IosIdentifiers for Vendor {
    async fn identifier_for_vendor(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("E621E1F8-C36C-495A-93FC-0C247A3E6E5F".to_string()))
    }
}

/// App Tracking Transparency with a fixed user answer.
pub struct Att(pub TrackingPermissionStatus);

#[async_trait::async_trait]
impl TrackingTransparency for Att {
    async fn is_available(&self) -> Result<bool, CapabilityError> {
        Ok(true)
    }

    async fn permission_status(&self) -> Result<TrackingPermissionStatus, CapabilityError> {
        Ok(TrackingPermissionStatus::Undetermined)
    }

    async fn request_permission(&self) -> Result<TrackingPermissionStatus, CapabilityError> {
        Ok(self.0)
    }

    async fn advertising_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("IDFA-1234".to_string()))
    }
}

#[derive(Default)]
pub struct Browser(Mutex<Vec<String>>);

impl Browser {
    pub fn opened(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UrlOpener for Browser {
    async fn open_url(&self, url: String) -> Result<(), CapabilityError> {
        self.0.lock().unwrap().push(url);
        Ok(())
    }
}

pub const BASE_URL: &str = "https://backend.x.test";

pub struct App {
    pub client: LinkrunnerClient,
    pub backend: Arc<ScriptedBackend>,
    pub browser: Arc<Browser>,
}

pub fn app(platform: PlatformCapabilities) -> App {
    let backend = Arc::new(ScriptedBackend::default());
    let browser = Arc::new(Browser::default());

    let collector = DeviceFingerprintCollector::new(
        Arc::new(Pixel),
        Arc::new(DemoApp),
        Arc::new(Cellular),
        Arc::new(platform),
    );

    let client = LinkrunnerClient::new(
        Arc::new(LinkrunnerConfig::custom(
            format!("{BASE_URL}/"),
            "ANDROID".to_string(),
            false,
        )),
        Arc::new(MemoryStore::default()),
        backend.clone(),
        Arc::new(collector),
        browser.clone(),
    );

    App {
        client,
        backend,
        browser,
    }
}
