//! HTTP surface
//!
//! Thin actix-web adapters over the service layer. Handlers only translate
//! between HTTP and service calls; all link semantics live in `services`.

pub mod error;
pub mod services;

pub use error::ErrorBody;
pub use services::{AppServices, HealthInfo};
