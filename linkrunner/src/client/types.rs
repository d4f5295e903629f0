use std::collections::HashMap;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Identifies the end user of the host app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct UserData {
    /// The host's user id
    pub id: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Mixpanel distinct id, for cross-tool stitching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixpanel_distinct_id: Option<String>,
    /// Amplitude device id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude_device_id: Option<String>,
    /// PostHog distinct id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posthog_distinct_id: Option<String>,
}

/// A free-form value in signup data or event data.
///
/// Scalars serialize as the bare JSON value. `Json` carries nested objects or arrays as JSON
/// text and is embedded as parsed JSON; text that does not parse fails the request.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum AttributeValue {
    /// String value
    Text {
        /// The value
        value: String,
    },
    /// Whole number
    Integer {
        /// The value
        value: i64,
    },
    /// Floating point number
    Number {
        /// The value
        value: f64,
    },
    /// Boolean
    Boolean {
        /// The value
        value: bool,
    },
    /// Any JSON value, given as JSON text
    Json {
        /// The JSON text
        value: String,
    },
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text { value } => serializer.serialize_str(value),
            Self::Integer { value } => serializer.serialize_i64(*value),
            Self::Number { value } => serializer.serialize_f64(*value),
            Self::Boolean { value } => serializer.serialize_bool(*value),
            Self::Json { value } => serde_json::from_str::<Value>(value)
                .map_err(|e| S::Error::custom(format!("attribute is not valid JSON: {e}")))?
                .serialize(serializer),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text {
            value: value.to_string(),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer { value }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number { value }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean { value }
    }
}

impl From<&Value> for AttributeValue {
    fn from(value: &Value) -> Self {
        Self::Json {
            value: value.to_string(),
        }
    }
}

/// Caller supplied key/value data.
pub type Attributes = HashMap<String, AttributeValue>;

/// Where the init call originates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitSource {
    /// Regular app start
    #[default]
    General,
    /// Start attributed to an ad click
    Ads,
}

/// Optional knobs for `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct InitOptions {
    /// Reported to the backend as the `debug` flag
    pub debug: Option<bool>,
    /// Origin of the init call
    pub source: InitSource,
    /// Deferred link the app was opened with, if any
    pub link: Option<String>,
}

/// Kind of captured payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// First payment of the user
    FirstPayment,
    /// Wallet top-up
    WalletTopup,
    /// Withdrawal of funds
    FundsWithdrawal,
    /// New subscription
    SubscriptionCreated,
    /// Subscription renewal
    SubscriptionRenewed,
    /// Unspecified
    Default,
    /// One-time purchase
    OneTime,
    /// Recurring charge
    Recurring,
}

/// Lifecycle state of a captured payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment started
    PaymentInitiated,
    /// Payment succeeded
    PaymentCompleted,
    /// Payment failed
    PaymentFailed,
    /// Payment cancelled by the user
    PaymentCancelled,
}

/// Payment reported through `capture_payment`.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct CapturePaymentRequest {
    /// Paying user
    pub user_id: String,
    /// Amount in the app's currency
    pub amount: f64,
    /// Host side payment id
    pub payment_id: Option<String>,
    /// Kind of payment
    pub payment_type: Option<PaymentType>,
    /// State of the payment
    pub status: Option<PaymentStatus>,
}

/// Selects captured payments to remove. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct RemovePaymentRequest {
    /// Remove the payments of this user
    pub user_id: Option<String>,
    /// Remove this payment
    pub payment_id: Option<String>,
}

/// Typed view of the `data` object returned by init.
///
/// Fields of an unexpected JSON type read as `None`; `raw_json` always has the full object.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct InitResponse {
    /// Deferred deeplink assigned to this install
    pub deeplink: Option<String>,
    /// Whether the deeplink points at the root domain
    pub root_domain: Option<bool>,
    /// Attribution source, e.g. `ORGANIC`, `META`, `GOOGLE`
    pub attribution_source: Option<String>,
    /// The complete `data` object as JSON, including fields not modelled here
    pub raw_json: String,
}

impl InitResponse {
    pub(crate) fn from_data(data: &Value) -> Self {
        Self {
            deeplink: string_field(data, "deeplink"),
            root_domain: bool_field(data, "root_domain"),
            attribution_source: string_field(data, "attribution_source"),
            raw_json: data.to_string(),
        }
    }
}

/// Typed view of the `data` object returned by signup.
///
/// Fields of an unexpected JSON type read as `None`; `raw_json` always has the full object.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct TriggerResponse {
    /// Deeplink for the user, if any
    pub deeplink: Option<String>,
    /// Whether the deeplink points at the root domain
    pub root_domain: Option<bool>,
    /// Whether the backend asks the app to act on the deeplink
    pub trigger: Option<bool>,
    /// The complete `data` object as JSON, including fields not modelled here
    pub raw_json: String,
}

impl TriggerResponse {
    pub(crate) fn from_data(data: &Value) -> Self {
        Self {
            deeplink: string_field(data, "deeplink"),
            root_domain: bool_field(data, "root_domain"),
            trigger: bool_field(data, "trigger"),
            raw_json: data.to_string(),
        }
    }
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(data: &Value, key: &str) -> Option<bool> {
    data.get(key).and_then(Value::as_bool)
}
