//! Campaign Runner for Blitz Napoleonic
//!
//! This crate provides infrastructure for:
//! - Running self-play games between two strategies, one half-move at a time
//! - Consulting a remote advisor with a local fallback
//! - Pausing, restarting and re-assigning strategies while a game runs
//! - Tallying series of games
//!
//! # Usage
//!
//! ```bash
//! # Local capture-biased play on both sides
//! cargo run -p campaign -- --white aggressive --black random
//!
//! # Ten quiet games against the remote advisor, with a JSON report
//! GEMINI_API_KEY=... cargo run -p campaign -- --black gemini --games 10 --quiet --report series.json
//! ```

mod config;
mod display;
mod results;
mod runner;
mod selector;

pub use config::*;
pub use display::*;
pub use results::*;
pub use runner::*;
pub use selector::*;
