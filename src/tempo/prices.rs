use crate::config::PricesConfig;
use crate::error::{Result, TempoError};
use crate::tempo::types::DayType;

/// Peak and off-peak price of one day colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEntry {
    pub peak: f64,
    pub off_peak: f64,
}

/// Prices for every day colour, complete by construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTable {
    blue: PriceEntry,
    white: PriceEntry,
    red: PriceEntry,
}

impl PriceTable {
    pub fn new(blue: PriceEntry, white: PriceEntry, red: PriceEntry) -> Self {
        Self { blue, white, red }
    }

    /// Build the table, failing if any colour is missing or holds an invalid price
    pub fn from_config(prices: &PricesConfig) -> Result<Self> {
        let entry = |day_type: DayType| -> Result<PriceEntry> {
            let cfg = prices.get(day_type).ok_or_else(|| {
                TempoError::config(format!(
                    "missing prices for red/blue/white: no entry for {}",
                    day_type
                ))
            })?;
            if [cfg.peak, cfg.off_peak]
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0)
            {
                return Err(TempoError::config(format!(
                    "invalid price for {}: peak={}, off_peak={}",
                    day_type, cfg.peak, cfg.off_peak
                )));
            }
            Ok(PriceEntry {
                peak: cfg.peak,
                off_peak: cfg.off_peak,
            })
        };

        Ok(Self {
            blue: entry(DayType::Blue)?,
            white: entry(DayType::White)?,
            red: entry(DayType::Red)?,
        })
    }

    pub fn lookup(&self, day_type: DayType) -> PriceEntry {
        match day_type {
            DayType::Blue => self.blue,
            DayType::White => self.white,
            DayType::Red => self.red,
        }
    }
}
