//! Infrastructure adapters and runtime bootstrap.

pub mod assets;
pub mod carbone;
pub mod error;
pub mod http;
pub mod store;
pub mod telemetry;
