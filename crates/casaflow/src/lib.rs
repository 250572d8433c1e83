//! Core library for the casaflow marketplace platform: configuration,
//! telemetry, and the messaging moderation and profile verification
//! workflows shared by the HTTP service and the CLI tooling.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
