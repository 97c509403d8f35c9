//! storefront-hex: storefront application services and their HTTP adapter.

pub mod config;
pub mod errors;

pub mod application;

pub use storefront_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
