pub mod health;
pub mod matches;
pub mod players;
pub mod seasons;
pub mod stats;
pub mod summary;
pub mod teams;
