//! Test utilities for unit tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::fingerprint::DeviceFingerprintCollector;
use crate::primitives::capabilities::{
    AndroidIdentifiers, ApplicationInfo, CapabilityError, DeviceInfo, DeviceType, IosIdentifiers,
    NetworkInfo, NetworkState, NetworkType, TrackingPermissionStatus, TrackingTransparency,
    UrlOpener,
};
use crate::primitives::config::LinkrunnerConfig;
use crate::primitives::http_client::{HttpClient, HttpError, HttpHeader};
use crate::primitives::key_value_store::{DeviceKeyValueStore, KeyValueStoreError};
use crate::primitives::platform::PlatformCapabilities;
use crate::LinkrunnerClient;

/// In-memory implementation of `DeviceKeyValueStore` with switchable failures.
#[derive(Default)]
pub struct InMemoryDeviceKeyValueStore {
    store: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDeviceKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DeviceKeyValueStore for InMemoryDeviceKeyValueStore {
    fn get(&self, key: String) -> Result<String, KeyValueStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KeyValueStoreError::ParsingFailure);
        }
        let value = self.store.lock().unwrap().get(&key).cloned();
        value.ok_or(KeyValueStoreError::KeyNotFound)
    }

    fn set(&self, key: String, value: String) -> Result<(), KeyValueStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeyValueStoreError::UpdateFailure);
        }
        self.store.lock().unwrap().insert(key, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A request captured by [`MockHttpClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Records every request and replies from a queue; an empty queue answers `{"status":200}`.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<Result<Vec<u8>, HttpError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(&self, body: serde_json::Value) {
        self.respond_raw(serde_json::to_vec(&body).unwrap());
    }

    pub fn respond_raw(&self, body: Vec<u8>) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn respond_error(&self, error: HttpError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url.ends_with(path))
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpClient for MockHttpClient {
    async fn post(
        &self,
        url: String,
        headers: Vec<HttpHeader>,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, HttpError> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { url, headers, body });
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(br#"{"status":200}"#.to_vec()));
        // Suspend like a real transport so concurrent calls interleave.
        tokio::task::yield_now().await;
        response
    }
}

#[derive(Default)]
pub struct FakeDeviceInfo {
    pub fail_brand: bool,
}

#[async_trait::async_trait]
impl DeviceInfo for FakeDeviceInfo {
    fn brand(&self) -> Result<Option<String>, CapabilityError> {
        if self.fail_brand {
            return Err(CapabilityError::Failed {
                message: "brand lookup crashed".to_string(),
            });
        }
        Ok(Some("google".to_string()))
    }

    fn model_name(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Pixel 8".to_string()))
    }

    fn model_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("shiba".to_string()))
    }

    fn manufacturer(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Google".to_string()))
    }

    fn os_version(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("14".to_string()))
    }

    fn device_name(&self) -> Result<Option<String>, CapabilityError> {
        Ok(None)
    }

    async fn device_type(&self) -> Result<DeviceType, CapabilityError> {
        Ok(DeviceType::Phone)
    }
}

pub struct FakeApplicationInfo;

impl ApplicationInfo for FakeApplicationInfo {
    fn application_name(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("Linkrunner Demo".to_string()))
    }

    fn application_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("io.linkrunner.demo".to_string()))
    }

    fn application_version(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("2.4.1".to_string()))
    }

    fn build_version(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("241".to_string()))
    }
}

pub struct FakeNetworkInfo {
    pub network_type: NetworkType,
    pub fail_network_state: bool,
}

impl Default for FakeNetworkInfo {
    fn default() -> Self {
        Self {
            network_type: NetworkType::Wifi,
            fail_network_state: false,
        }
    }
}

#[async_trait::async_trait]
impl NetworkInfo for FakeNetworkInfo {
    async fn network_state(&self) -> Result<NetworkState, CapabilityError> {
        if self.fail_network_state {
            return Err(CapabilityError::Unavailable);
        }
        Ok(NetworkState {
            network_type: self.network_type,
            is_connected: Some(true),
        })
    }

    async fn ip_address(&self) -> Result<String, CapabilityError> {
        Ok("10.0.0.7".to_string())
    }
}

#[derive(Default)]
pub struct FakeAndroidIdentifiers {
    pub fail_advertising_id: bool,
}

#[async_trait::async_trait]
impl AndroidIdentifiers for FakeAndroidIdentifiers {
    async fn android_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("android-id-1".to_string()))
    }

    async fn advertising_id(&self) -> Result<Option<String>, CapabilityError> {
        if self.fail_advertising_id {
            return Err(CapabilityError::Unavailable);
        }
        Ok(Some("gaid-1".to_string()))
    }

    async fn install_referrer(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("utm_source=google-play".to_string()))
    }
}

pub struct FakeIosIdentifiers;

#[async_trait::async_trait]
impl IosIdentifiers for FakeIosIdentifiers {
    async fn identifier_for_vendor(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("IDFV-0000".to_string()))
    }
}

pub struct FakeTrackingTransparency {
    available: bool,
    status: TrackingPermissionStatus,
    answer: TrackingPermissionStatus,
    requests: AtomicUsize,
}

impl FakeTrackingTransparency {
    pub fn new(
        available: bool,
        status: TrackingPermissionStatus,
        answer: TrackingPermissionStatus,
    ) -> Self {
        Self {
            available,
            status,
            answer,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TrackingTransparency for FakeTrackingTransparency {
    async fn is_available(&self) -> Result<bool, CapabilityError> {
        Ok(self.available)
    }

    async fn permission_status(&self) -> Result<TrackingPermissionStatus, CapabilityError> {
        Ok(self.status)
    }

    async fn request_permission(&self) -> Result<TrackingPermissionStatus, CapabilityError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }

    async fn advertising_id(&self) -> Result<Option<String>, CapabilityError> {
        Ok(Some("IDFA-0000".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingUrlOpener {
    pub fail: bool,
    opened: Mutex<Vec<String>>,
}

impl RecordingUrlOpener {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UrlOpener for RecordingUrlOpener {
    async fn open_url(&self, url: String) -> Result<(), CapabilityError> {
        if self.fail {
            return Err(CapabilityError::Failed {
                message: "no activity found".to_string(),
            });
        }
        self.opened.lock().unwrap().push(url);
        Ok(())
    }
}

pub fn collector_for(platform: PlatformCapabilities) -> DeviceFingerprintCollector {
    DeviceFingerprintCollector::new(
        Arc::new(FakeDeviceInfo::default()),
        Arc::new(FakeApplicationInfo),
        Arc::new(FakeNetworkInfo::default()),
        Arc::new(platform),
    )
}

/// A client wired to in-memory fakes, with handles to inspect them.
pub struct TestClient {
    pub client: LinkrunnerClient,
    pub store: Arc<InMemoryDeviceKeyValueStore>,
    pub http: Arc<MockHttpClient>,
    pub opener: Arc<RecordingUrlOpener>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_opener(RecordingUrlOpener::default())
    }

    pub fn with_opener(opener: RecordingUrlOpener) -> Self {
        let store = Arc::new(InMemoryDeviceKeyValueStore::new());
        let http = Arc::new(MockHttpClient::new());
        let opener = Arc::new(opener);
        let client = LinkrunnerClient::new(
            Arc::new(LinkrunnerConfig::custom(
                "https://api.x.test".to_string(),
                "EXPO".to_string(),
                true,
            )),
            store.clone(),
            http.clone(),
            Arc::new(collector_for(PlatformCapabilities::generic())),
            opener.clone(),
        );
        Self {
            client,
            store,
            http,
            opener,
        }
    }
}
