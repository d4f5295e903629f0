/// HTTP transport that native applications implement for the SDK to reach the attribution backend.
///
/// Requests go through the host's networking stack so platform concerns (TLS, proxies,
/// timeouts) stay with the platform. The SDK configures no timeout of its own; a transport that
/// never completes leaves the awaiting caller pending.
///
/// Implementations should map platform-specific errors to the matching `HttpError` variant.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a `POST` request and returns the raw response body.
    ///
    /// # Arguments
    /// * `url` - Absolute URL of the endpoint
    /// * `headers` - Request headers to send
    /// * `body` - Serialized JSON request body
    ///
    /// # Errors
    /// * `HttpError::BadStatusCode` - For HTTP error status codes (4xx, 5xx) with response body
    /// * `HttpError::NoConnectivity` - When no internet connection is available
    /// * `HttpError::Timeout` - When the platform transport timed out
    /// * `HttpError::DnsResolutionFailed` - When DNS lookup fails
    /// * `HttpError::ConnectionRefused` - When the server refuses the connection
    /// * `HttpError::SslError` - When SSL/TLS validation fails
    /// * `HttpError::Cancelled` - When the request is cancelled
    /// * `HttpError::Generic` - For other unexpected errors
    async fn post(
        &self,
        url: String,
        headers: Vec<HttpHeader>,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, HttpError>;
}

/// A single HTTP request header.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct HttpHeader {
    /// Header name, e.g. `Content-Type`
    pub name: String,
    /// Header value
    pub value: String,
}

impl HttpHeader {
    /// Builds a header from borrowed parts.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Represents HTTP-related errors that can occur during network requests.
#[crate::linkrunner_error]
pub enum HttpError {
    /// HTTP error with specific status code (4xx, 5xx responses)
    #[error("Bad status code {code}")]
    BadStatusCode {
        /// The HTTP status code that was returned
        code: u64,
        /// The response body, which may contain error details
        response_body: Vec<u8>,
    },
    /// No internet connectivity available
    #[error("No internet connectivity")]
    NoConnectivity,
    /// Request timed out
    #[error("Request timed out after {seconds} seconds")]
    Timeout {
        /// Number of seconds before timeout occurred
        seconds: u64,
    },
    /// DNS resolution failed for the hostname
    #[error("DNS resolution failed for {hostname}")]
    DnsResolutionFailed {
        /// The hostname that failed to resolve
        hostname: String,
    },
    /// Connection was refused by the server
    #[error("Connection refused by {host}")]
    ConnectionRefused {
        /// The host that refused the connection
        host: String,
    },
    /// SSL/TLS certificate validation failed
    #[error("SSL certificate validation failed: {reason}")]
    SslError {
        /// Reason for the SSL failure
        reason: String,
    },
    /// The request was cancelled before completion
    #[error("Request was cancelled")]
    Cancelled,
    /// Generic error for unexpected errors
    #[error("Generic error: {message}")]
    Generic {
        /// The error message
        message: String,
    },
}

/// Converts unexpected UniFFI callback errors to `HttpError`.
///
/// Foreign implementations that throw something outside the declared error type would
/// otherwise panic the Rust side. A bare numeric reason is read as a status code.
impl From<uniffi::UnexpectedUniFFICallbackError> for HttpError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        error.reason.parse::<u64>().map_or_else(
            |_| Self::Generic {
                message: error.reason.clone(),
            },
            |code| Self::BadStatusCode {
                code,
                response_body: Vec::new(),
            },
        )
    }
}
