//! Simulated trading academy: signup, a gated assessment, course purchases,
//! and paper trading against a random-walk market feed. All money is play
//! money; the single user record persists across runs in a local SQLite file.

pub mod academy;
pub mod assessment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod market;
pub mod orders;
pub mod store;
pub mod user;
