//! Core data models for the league tracker.

mod ids;
mod match_record;
mod player;
mod season;
mod stats;
mod summary;

pub use ids::*;
pub use match_record::*;
pub use player::*;
pub use season::*;
pub use stats::*;
pub use summary::*;
