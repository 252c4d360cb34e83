use crate::tempo::prices::PriceTable;
use crate::tempo::types::{DayTypeRecord, RateInterval};
use crate::tempo::window::local_day_offset;
use chrono_tz::Tz;

/// Local hour at which the peak window opens
pub const PEAK_START_HOUR: i64 = 6;
/// Local hour at which the peak window closes and off-peak begins
pub const PEAK_END_HOUR: i64 = 22;
/// Off-peak ends at 06:00 on the following day
pub const OFF_PEAK_END_HOUR: i64 = 24 + PEAK_START_HOUR;

/// Expand one day record into its peak and off-peak intervals
///
/// Records with an unknown colour yield nothing. Overlapping records are not
/// de-duplicated.
pub fn expand(record: &DayTypeRecord, prices: &PriceTable, tz: Tz) -> Vec<RateInterval> {
    let Some(day_type) = record.day_type() else {
        return Vec::new();
    };
    let price = prices.lookup(day_type);
    let at = |hours| local_day_offset(&record.start_date, tz, hours);

    vec![
        RateInterval {
            start: at(PEAK_START_HOUR),
            end: at(PEAK_END_HOUR),
            value: price.peak,
        },
        RateInterval {
            start: at(PEAK_END_HOUR),
            end: at(OFF_PEAK_END_HOUR),
            value: price.off_peak,
        },
    ]
}

/// Expand every record into one flat list
pub fn expand_all(records: &[DayTypeRecord], prices: &PriceTable, tz: Tz) -> Vec<RateInterval> {
    records
        .iter()
        .flat_map(|r| expand(r, prices, tz))
        .collect()
}

/// Order by start, keeping input order among equal starts
pub fn sort_rates(rates: &mut [RateInterval]) {
    rates.sort_by_key(|r| r.start);
}
