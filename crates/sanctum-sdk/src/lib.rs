//! # Sanctum SDK
//!
//! Request transport for the Oracle Sanctum analysis service.

pub mod client;
pub mod config;
pub mod transport;

pub use client::{HealthResponse, SanctumClient};
pub use config::ClientConfig;
pub use transport::{AnalysisTransport, InterpretRequest};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::SanctumClient;
    pub use crate::config::ClientConfig;
    pub use crate::transport::{AnalysisTransport, InterpretRequest};
    pub use sanctum_core::prelude::*;
}
