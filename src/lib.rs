//! docrelay: queue document-rendering jobs and relay them to the Carbone API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
