//! Request/response layer shared by every client operation.

use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{AnyhowErrorExt, LinkrunnerError};
use crate::primitives::http_client::{HttpClient, HttpError, HttpHeader};

pub(crate) const INIT_PATH: &str = "/api/client/init";
pub(crate) const TRIGGER_PATH: &str = "/api/client/trigger";
pub(crate) const SET_USER_DATA_PATH: &str = "/api/client/set-user-data";
pub(crate) const CAPTURE_PAYMENT_PATH: &str = "/api/client/capture-payment";
pub(crate) const REMOVE_PAYMENT_PATH: &str = "/api/client/remove-captured-payment";
pub(crate) const CAPTURE_EVENT_PATH: &str = "/api/client/capture-event";
pub(crate) const DEEPLINK_TRIGGERED_PATH: &str = "/api/client/deeplink-triggered";

/// `{ status, data?, msg? }` wrapper around every backend response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<Number>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    msg: Option<String>,
}

impl Envelope {
    fn parse(body: &[u8]) -> Result<Self, LinkrunnerError> {
        serde_json::from_slice(body)
            .context("response body is not a JSON envelope")
            .map_err(|e| LinkrunnerError::MalformedResponse {
                message: e.to_generic_message(),
            })
    }

    /// The status as an integer; integral floats such as `200.0` count as well.
    #[allow(clippy::cast_possible_truncation)]
    fn status_code(&self) -> Option<i64> {
        let status = self.status.as_ref()?;
        status.as_i64().or_else(|| {
            status
                .as_f64()
                .filter(|code| code.fract() == 0.0 && code.abs() < 1e15)
                .map(|code| code as i64)
        })
    }

    fn into_data(self) -> Result<Option<Value>, LinkrunnerError> {
        match self.status_code() {
            Some(200 | 201) => Ok(self.data),
            status => Err(LinkrunnerError::Rejected {
                status: status.unwrap_or_default(),
                message: self.msg.unwrap_or_default(),
            }),
        }
    }
}

/// Posts JSON payloads to the attribution backend and unwraps the response envelope.
pub(crate) struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl ApiClient {
    pub(crate) fn new(base_url: String, http: Arc<dyn HttpClient>) -> Self {
        Self { base_url, http }
    }

    /// Sends `payload` to `path` and returns the envelope's `data` on a 200/201 status.
    pub(crate) async fn post<P: Serialize + Sync>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<Option<Value>, LinkrunnerError> {
        let body = serde_json::to_vec(payload)
            .context("failed to serialize request payload")?;

        let headers = vec![
            HttpHeader::new("Accept", "application/json"),
            HttpHeader::new("Content-Type", "application/json"),
        ];

        let response = match self
            .http
            .post(format!("{}{path}", self.base_url), headers, body)
            .await
        {
            Ok(response) => response,
            // Transports that surface 4xx/5xx as errors still carry the envelope.
            Err(HttpError::BadStatusCode {
                code,
                response_body,
            }) => {
                return Err(Envelope::parse(&response_body).map_or_else(
                    |_| {
                        LinkrunnerError::Http(HttpError::BadStatusCode {
                            code,
                            response_body,
                        })
                    },
                    |envelope| match envelope.into_data() {
                        Err(rejected) => rejected,
                        Ok(_) => LinkrunnerError::Rejected {
                            status: i64::try_from(code).unwrap_or(i64::MAX),
                            message: String::new(),
                        },
                    },
                ));
            }
            Err(e) => return Err(e.into()),
        };

        Envelope::parse(&response)?.into_data()
    }
}
