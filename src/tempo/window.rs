//! Local wall-clock arithmetic
//!
//! Tempo windows are defined on the local clock (06:00 and 22:00), so hours are
//! added to the local wall-clock time and only the result is converted to UTC.
//! On daylight-saving days this keeps the windows on 06:00/22:00 instead of
//! drifting by an hour.

use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolve a wall-clock time in `tz`
///
/// Ambiguous times (clocks going back) take the earlier instant. Times skipped
/// by a forward jump are read with the offset in force before the jump.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = tz
                .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
                .fix();
            let utc = naive - TimeDelta::seconds(i64::from(before.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// `anchor` seen on the local clock, moved by `hours` of wall-clock time, in UTC
pub fn local_day_offset<Z: TimeZone>(anchor: &DateTime<Z>, tz: Tz, hours: i64) -> DateTime<Utc> {
    let local = anchor.with_timezone(&tz).naive_local() + TimeDelta::hours(hours);
    resolve_local(tz, local).with_timezone(&Utc)
}

/// Calendar query window: local midnight yesterday up to local midnight the day after tomorrow
pub fn calendar_window(now: DateTime<Utc>, tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
    let today = now.with_timezone(&tz).date_naive();
    let start = resolve_local(tz, (today - TimeDelta::days(1)).and_time(NaiveTime::MIN));
    let end = resolve_local(tz, (today + TimeDelta::days(2)).and_time(NaiveTime::MIN));
    (start, end)
}
