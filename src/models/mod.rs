//! Data transfer objects (DTOs) for API responses.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `github`: GitHubUser profile and RawEvent activity records
//! - `stats`: CommitStats derived from push events
//! - `health`: PlantHealth, PlantState, Trend
//! - `garden`: GardenSnapshot, SessionInfo, ServiceStatus

pub mod garden;
pub mod github;
pub mod health;
pub mod stats;

pub use garden::*;
pub use github::*;
pub use health::*;
pub use stats::*;
