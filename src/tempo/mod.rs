//! Tempo calendar integration
//!
//! Fetches the RTE Tempo day colours and turns each day into a peak window
//! (06:00-22:00 local) and an off-peak window (22:00-06:00 local) priced from
//! the configured table.

pub mod client;
pub mod prices;
pub mod service;
pub mod transform;
pub mod types;
pub mod window;

pub use client::{CalendarSource, UpstreamClient};
pub use prices::{PriceEntry, PriceTable};
pub use service::RateService;
pub use transform::{expand, expand_all, sort_rates};
pub use types::{DayType, DayTypeRecord, RateInterval, Token};
pub use window::{calendar_window, local_day_offset};
