use crate::logging::{StructuredLogger, get_logger};
use crate::tempo::client::CalendarSource;
use crate::tempo::prices::PriceTable;
use crate::tempo::transform::{expand_all, sort_rates};
use crate::tempo::types::RateInterval;
use crate::tempo::window::calendar_window;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Fetch-transform pipeline answering each `/prices` request
///
/// Shared state is read-only: the price table, the time zone and the upstream
/// client. Every call performs a fresh token exchange and calendar fetch.
pub struct RateService {
    source: Arc<dyn CalendarSource>,
    prices: PriceTable,
    tz: Tz,
    logger: StructuredLogger,
}

impl RateService {
    pub fn new(source: Arc<dyn CalendarSource>, prices: PriceTable, tz: Tz) -> Self {
        Self {
            source,
            prices,
            tz,
            logger: get_logger("rates"),
        }
    }

    /// Rates covering yesterday through tomorrow
    pub async fn current_rates(&self) -> Vec<RateInterval> {
        self.rates_at(Utc::now()).await
    }

    /// Rates for the window around `now`; upstream failures yield an empty list
    pub async fn rates_at(&self, now: DateTime<Utc>) -> Vec<RateInterval> {
        let token = match self.source.token().await {
            Ok(token) => token,
            Err(e) => {
                self.logger
                    .error(&format!("Error retrieving RTE token: {}", e));
                return Vec::new();
            }
        };

        let (start, end) = calendar_window(now, self.tz);
        let records = match self.source.calendar(&token, start, end).await {
            Ok(records) => records,
            Err(e) => {
                self.logger.error(&e.to_string());
                return Vec::new();
            }
        };

        let mut rates = expand_all(&records, &self.prices, self.tz);
        let dropped = records.len() - rates.len() / 2;
        if dropped > 0 {
            self.logger.debug(&format!(
                "Dropped {} records with unknown day type",
                dropped
            ));
        }
        sort_rates(&mut rates);
        rates
    }
}
