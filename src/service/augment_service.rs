use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use icalendar::{Alarm, Calendar, CalendarComponent, Component, DatePerhapsTime, EventLike, Trigger};

use crate::clients::portal_client::PortalSession;
use crate::error::AppError;
use crate::models::shift::{self, ShiftKind};
use crate::service::duty_resolver;
use crate::service::night_hours::{night_hours, to_local_datetime};

const ALARM_MESSAGE: &str = "Reminder: duty tomorrow.";
const ALARM_HOURS_BEFORE: i64 = 24;

/// What to do when one event's duty resolution fails.
///
/// Calendar-shape problems (missing SUMMARY, DTSTART or DTEND) abort the
/// run regardless of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole run on the first resolution error.
    #[default]
    Abort,
    /// Log the failure and continue with the remaining events.
    SkipEvent,
}

pub fn load_calendar(path: &Path) -> Result<Calendar, AppError> {
    let raw = fs::read_to_string(path)?;
    raw.parse::<Calendar>().map_err(AppError::MalformedDocument)
}

/// Writes the serialized calendar in one shot, after all events processed.
pub fn write_calendar(path: &Path, calendar: &Calendar) -> Result<(), AppError> {
    fs::write(path, calendar.to_string())?;
    Ok(())
}

/// Walks every VEVENT in document order and rewrites work duties in place:
/// itinerary description with a night-hours line, a 24h reminder alarm and
/// the configured location. Training and non-work events stay untouched.
pub async fn augment_calendar<S>(
    calendar: &mut Calendar,
    session: &S,
    local_tz: Tz,
    location: &str,
    policy: FailurePolicy,
) -> Result<(), AppError>
where
    S: PortalSession + ?Sized,
{
    for component in calendar.components.iter_mut() {
        let CalendarComponent::Event(event) = component else {
            continue;
        };
        let title = match event.get_summary() {
            Some(summary) => shift::strip_provisional(summary).to_string(),
            None => {
                return Err(AppError::MalformedDocument(
                    "event without SUMMARY".to_string(),
                ));
            }
        };
        if shift::classify(&title) != ShiftKind::Work {
            continue;
        }

        let start = event_instant(event.get_start(), "DTSTART", &title, local_tz)?;
        let end = event_instant(event.get_end(), "DTEND", &title, local_tz)?;

        let duty = match duty_resolver::resolve(session, &title, start.date_naive()).await {
            Ok(duty) => duty,
            Err(error) => match policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::SkipEvent => {
                    eprintln!("Skipping {}: {}", title, error);
                    continue;
                }
            },
        };

        let mut description = duty.event_description();
        description.push('\n');
        description.push_str(&format!("Night hours: '{:.2}'", night_hours(start, end)));
        event.description(&description);
        event.alarm(Alarm::display(
            ALARM_MESSAGE,
            Trigger::before_start(Duration::hours(ALARM_HOURS_BEFORE)),
        ));
        event.location(location.trim());
        println!("Augmented {} ({} actions)", title, duty.actions.len());
    }
    Ok(())
}

fn event_instant(
    value: Option<DatePerhapsTime>,
    property: &str,
    title: &str,
    local_tz: Tz,
) -> Result<DateTime<Tz>, AppError> {
    let value = value.ok_or_else(|| {
        AppError::MalformedDocument(format!("event '{title}' without {property}"))
    })?;
    to_local_datetime(&value, local_tz)
}
