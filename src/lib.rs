// Library for the binary and the integration tests

pub mod client;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod poller;
pub mod reconciler;
pub mod routes;
pub mod version;
pub mod visibility;
