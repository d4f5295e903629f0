//! Error types returned by the attribution client.
//!
//! Every public operation resolves to `Result<_, LinkrunnerError>`. Failures are also logged, so
//! hosts that only care about success can ignore the error.

use crate::primitives::http_client::HttpError;

/// Failure reasons of the attribution client.
#[crate::linkrunner_error]
pub enum LinkrunnerError {
    /// An operation other than `init` ran before a token was set
    #[error("token not initialized, call init first")]
    TokenNotInitialized,
    /// `trigger_deeplink` found no cached deeplink
    #[error("deeplink URL not found")]
    DeeplinkNotFound,
    /// A required argument is missing or malformed; no request was sent
    #[error("invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },
    /// The transport failed before a response body could be read
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The backend answered with a status other than 200/201
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// Status reported in the response envelope
        status: i64,
        /// Server supplied message, empty when absent
        message: String,
    },
    /// The response body was not the expected JSON envelope
    #[error("malformed response: {message}")]
    MalformedResponse {
        /// Parse failure with its context chain
        message: String,
    },
    /// The platform refused to open the deeplink
    #[error("failed to open URL: {message}")]
    UrlOpenFailed {
        /// Host supplied reason
        message: String,
    },
}

impl LinkrunnerError {
    pub(crate) fn validation(message: &str) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }
}

/// Helper trait for flattening anyhow errors into FFI-friendly messages.
pub trait AnyhowErrorExt {
    /// Convert an anyhow error to a string, preserving the error chain
    fn to_generic_message(self) -> String;
}

impl AnyhowErrorExt for anyhow::Error {
    fn to_generic_message(self) -> String {
        let mut message = self.to_string();

        let chain: Vec<String> = self.chain().skip(1).map(ToString::to_string).collect();
        if !chain.is_empty() {
            message.push_str(" (caused by: ");
            message.push_str(&chain.join(" -> "));
            message.push(')');
        }

        message
    }
}
