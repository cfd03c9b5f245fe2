// src/core/mod.rs
//! Remote collaborators of a screening session

pub mod service_client;

#[cfg(test)]
pub mod fake;

pub use service_client::{HttpReply, ScreeningService, ServiceClient, TransportError};
