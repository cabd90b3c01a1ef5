use chrono::NaiveDate;

use crate::clients::portal_client::PortalSession;
use crate::error::AppError;
use crate::models::duty::Duty;
use crate::models::shift::{self, ShiftKind};
use crate::service::duty_parser;

/// Resolves one (title, date) pair into a [`Duty`] via the portal session.
///
/// Training shifts short-circuit to the sentinel duty without touching the
/// network. A lookup page without an allocation entry surfaces as
/// [`AppError::NotFound`] so callers can tell it apart from HTTP failures.
pub async fn resolve<S>(session: &S, title: &str, date: NaiveDate) -> Result<Duty, AppError>
where
    S: PortalSession + ?Sized,
{
    if shift::classify(title) == ShiftKind::Training {
        return Ok(Duty::training(title));
    }

    println!("Requesting duty {} {}", title, date);
    let lookup_page = session.duty_lookup(title, date).await?;
    let duty_id = duty_parser::parse_lookup(&lookup_page).map_err(|_| AppError::NotFound {
        title: title.to_string(),
        date,
    })?;

    let details_page = session.duty_details(&duty_id, date).await?;
    let actions = duty_parser::parse_details(&details_page);

    Ok(Duty::new(duty_id, title.to_string(), actions))
}
