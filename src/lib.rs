//! # League Tracker
//!
//! A recreational volleyball league tracker with seasonal statistics and
//! an AI-written daily summary.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, seasons, stats)
//! - **calculate**: Records, streaks, inactivity penalties and team keys
//! - **storage**: SQLite persistence
//! - **season**: Season token resolution
//! - **agents**: AI text generation
//! - **summary**: Daily summary cache
//! - **api**: REST API endpoints
//! - **export**: JSON snapshot of the league
//! - **config**: Configuration loading and validation

pub mod agents;
pub mod api;
pub mod calculate;
pub mod config;
pub mod export;
pub mod models;
pub mod season;
pub mod storage;
pub mod summary;

pub use models::*;
