//! # Tempo Rates - EDF Tempo tariff adapter for home energy managers
//!
//! Converts the RTE Tempo calendar (blue, white and red days, each split into
//! peak and off-peak hours) into a sorted list of time-bounded prices served
//! over HTTP, ready for tools such as evcc to plan charging around.
//!
//! ## Architecture
//!
//! - `config`: YAML configuration loading and validation
//! - `logging`: Structured logging and tracing
//! - `retry`: Exponential backoff with permanent-error classification
//! - `tempo`: Upstream client, price table, day expansion and orchestration
//! - `web`: HTTP server (`/ping`, `/prices`)

pub mod config;
pub mod error;
pub mod logging;
pub mod retry;
pub mod tempo;
pub mod web;


// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TempoError};
pub use tempo::{RateInterval, RateService};
