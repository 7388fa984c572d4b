//! fxtrend - Daily exchange-rate history, trend verdicts and advisories

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

pub use config::Config;
pub use error::{FxError, Result};
