//! Application services layer.

pub mod error;
pub mod jobs;
pub mod repos;
pub mod upstream;
