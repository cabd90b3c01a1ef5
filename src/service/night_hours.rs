use chrono::{DateTime, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use icalendar::{CalendarDateTime, DatePerhapsTime};

use crate::error::AppError;

const NIGHT_START_HOUR: u32 = 22;
const NIGHT_END_HOUR: u32 = 5;

/// Portion of `[start, end)` spent inside the nightly window, in hours.
///
/// The window runs 22:00 to 05:00 the following day and is anchored to the
/// calendar date of `start`, not of `end`. Never negative and never more
/// than the interval's own duration.
pub fn night_hours(start: DateTime<Tz>, end: DateTime<Tz>) -> f64 {
    let tz = start.timezone();
    let night_start = wall_clock(tz, start.date_naive(), NIGHT_START_HOUR);
    let night_end = wall_clock(tz, start.date_naive() + Days::new(1), NIGHT_END_HOUR);

    if end < night_start || start > night_end {
        return 0.0;
    }

    let overlap_start = start.max(night_start);
    let mut overlap_end = end.min(night_end);
    // A shift running past midnight can leave the clipped end behind the
    // clipped start; moving the end forward a day restores the real span.
    if overlap_end < overlap_start {
        overlap_end = overlap_end + Duration::days(1);
    }

    (overlap_end - overlap_start).num_seconds() as f64 / 3600.0
}

/// Normalizes an iCalendar timestamp into the configured local timezone.
///
/// Floating timestamps carry no zone and are read as UTC before the
/// conversion; skipping that step shifts every night-hour window.
pub fn to_local_datetime(value: &DatePerhapsTime, local_tz: Tz) -> Result<DateTime<Tz>, AppError> {
    match value {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(utc)) => Ok(utc.with_timezone(&local_tz)),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            Ok(naive.and_utc().with_timezone(&local_tz))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz: Tz = tzid.parse().map_err(|_| {
                AppError::MalformedDocument(format!("unknown timezone '{tzid}' on event timestamp"))
            })?;
            Ok(resolve_local(tz, *date_time).with_timezone(&local_tz))
        }
        DatePerhapsTime::Date(date) => Ok(resolve_local(local_tz, date.and_time(NaiveTime::MIN))),
    }
}

fn wall_clock(tz: Tz, date: NaiveDate, hour: u32) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).expect("window hour is a valid wall-clock time");
    resolve_local(tz, date.and_time(time))
}

fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Spring-forward gap: this wall-clock time does not exist locally.
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}
