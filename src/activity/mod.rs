//! Activity-to-health derivation.
//!
//! Pure functions only: no I/O, no clock reads. Every entry point takes `now`
//! explicitly and buckets timestamps into calendar days in `now`'s offset.
//! - `calendar`: day keys, the day window, the injectable `Clock`
//! - `stats`: raw events → `CommitStats` (windowing, streaks)
//! - `health`: commit history → `PlantHealth` (score, state, trend)
//! - `mood`: flavor text for the plant, driven by an injected rng

pub mod calendar;
pub mod health;
pub mod mood;
pub mod stats;

pub use calendar::{format_relative_time, Clock};
pub use health::evaluate_health;
pub use mood::mood_message;
pub use stats::derive_stats;
