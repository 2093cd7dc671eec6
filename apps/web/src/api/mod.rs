//! Backend and transport clients

pub mod client;
pub mod rfb;

pub use client::ApiClient;
pub use rfb::RfbTransport;
