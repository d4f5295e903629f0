/// Platform services provided by the host application.
pub mod capabilities;

/// SDK configuration handed to the client.
pub mod config;

/// HTTP transport provided by the host application.
pub mod http_client;

/// Durable key/value storage provided by the host application.
pub mod key_value_store;

/// Logging bridge to the host application.
pub mod logger;

/// Platform specific identifier collection.
pub mod platform;
