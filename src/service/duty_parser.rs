use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::models::duty::Action;

static ALLOCATION_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.allocation-container.display-full").expect("static selector"));
static CLICKABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.clickable").expect("static selector"));
static TABLE_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").expect("static selector"));
static CELL_VALUE: Lazy<Selector> = Lazy::new(|| Selector::parse("span.value").expect("static selector"));

static TRAIN_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.trip_numbers").expect("static selector"));
static NAME_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.type_long_name").expect("static selector"));
static START_LOCATION_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.start_location_long_name").expect("static selector"));
static START_TIME_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.start_time").expect("static selector"));
static END_LOCATION_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.end_location_long_name").expect("static selector"));
static END_TIME_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.end_time").expect("static selector"));

static DUTY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=(?P<id>\d+)").expect("static pattern"));
static DUTY_COMPONENT_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^duty-components").expect("static pattern"));

/// The lookup page carries no allocation entry for the requested date.
///
/// Distinct from an HTTP failure: the page loaded fine, the duty simply has
/// no record, which the caller may treat as a legitimate outcome.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no clickable allocation entry in the duty lookup page")]
pub struct LookupNotFound;

/// Extracts the numeric duty id from the allocation panel of a lookup page.
pub fn parse_lookup(html: &str) -> Result<String, LookupNotFound> {
    let document = Html::parse_document(html);
    let container = document
        .select(&ALLOCATION_CONTAINER)
        .next()
        .ok_or(LookupNotFound)?;
    let node = container.select(&CLICKABLE).next().ok_or(LookupNotFound)?;
    let data_url = node.value().attr("data-url").ok_or(LookupNotFound)?;
    let captures = DUTY_ID.captures(data_url).ok_or(LookupNotFound)?;
    Ok(captures["id"].to_string())
}

/// Reads the itinerary table of a duty details page, in document order.
pub fn parse_details(html: &str) -> Vec<Action> {
    let document = Html::parse_document(html);
    document
        .select(&TABLE_ROW)
        .filter(|row| {
            row.value()
                .classes()
                .any(|class| DUTY_COMPONENT_ROW.is_match(class))
        })
        .map(|row| Action {
            train: cell_value(row, &TRAIN_CELL),
            name: cell_value(row, &NAME_CELL),
            start_location: cell_value(row, &START_LOCATION_CELL),
            start_time: cell_value(row, &START_TIME_CELL),
            end_location: cell_value(row, &END_LOCATION_CELL),
            end_time: cell_value(row, &END_TIME_CELL),
        })
        .collect()
}

// Column absence is common on these pages; an absent cell reads as "".
fn cell_value(row: ElementRef<'_>, cell: &Selector) -> String {
    row.select(cell)
        .next()
        .and_then(|cell| cell.select(&CELL_VALUE).next())
        .map(|value| value.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_PAGE: &str = r#"
        <html><body>
          <div class="allocation-container display-full">
            <div class="clickable" data-url="any-duty-details?id=4711&amp;beginDate=2024-01-10">T123</div>
          </div>
        </body></html>"#;

    const DETAILS_PAGE: &str = r#"
        <html><body><table><tbody>
          <tr class="duty-components odd">
            <td class="trip_numbers mdl-data-table__cell--non-numeric"><span class="value">IC100</span></td>
            <td class="type_long_name mdl-data-table__cell--non-numeric"><span class="value">Jazda</span></td>
            <td class="start_location_long_name mdl-data-table__cell--non-numeric"><span class="value">Katowice</span></td>
            <td class="start_time mdl-data-table__cell--non-numeric"><span class="value">08:00</span></td>
            <td class="end_location_long_name mdl-data-table__cell--non-numeric"><span class="value">Kraków</span></td>
            <td class="end_time mdl-data-table__cell--non-numeric"><span class="value">09:30</span></td>
          </tr>
          <tr class="summary-row">
            <td class="trip_numbers mdl-data-table__cell--non-numeric"><span class="value">ignored</span></td>
          </tr>
          <tr class="duty-components even">
            <td class="trip_numbers mdl-data-table__cell--non-numeric"><span class="value">IC200</span></td>
            <td class="type_long_name mdl-data-table__cell--non-numeric"><span class="value">Jazda</span></td>
            <td class="start_location_long_name mdl-data-table__cell--non-numeric"><span class="value">Kraków</span></td>
            <td class="start_time mdl-data-table__cell--non-numeric"><span class="value">10:15</span></td>
            <td class="end_time mdl-data-table__cell--non-numeric"><span class="value">11:45</span></td>
          </tr>
        </tbody></table></body></html>"#;

    #[test]
    fn lookup_extracts_duty_id_from_data_url() {
        assert_eq!(parse_lookup(LOOKUP_PAGE).unwrap(), "4711");
    }

    #[test]
    fn lookup_without_allocation_container_is_not_found() {
        let page = "<html><body><div class=\"clickable\" data-url=\"id=1\"></div></body></html>";
        assert_eq!(parse_lookup(page), Err(LookupNotFound));
    }

    #[test]
    fn lookup_without_data_url_is_not_found() {
        let page = r#"<div class="allocation-container display-full">
            <div class="clickable">T123</div></div>"#;
        assert_eq!(parse_lookup(page), Err(LookupNotFound));
    }

    #[test]
    fn details_rows_parse_in_document_order() {
        let actions = parse_details(DETAILS_PAGE);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].train, "IC100");
        assert_eq!(actions[0].name, "Jazda");
        assert_eq!(actions[0].start_location, "Katowice");
        assert_eq!(actions[0].start_time, "08:00");
        assert_eq!(actions[0].end_location, "Kraków");
        assert_eq!(actions[0].end_time, "09:30");
        assert_eq!(actions[1].train, "IC200");
    }

    #[test]
    fn rows_without_duty_component_class_are_excluded() {
        let actions = parse_details(DETAILS_PAGE);
        assert!(actions.iter().all(|action| action.train != "ignored"));
    }

    #[test]
    fn missing_cell_yields_empty_field_not_an_error() {
        let actions = parse_details(DETAILS_PAGE);
        // The second itinerary row has no end_location column.
        assert_eq!(actions[1].end_location, "");
        assert_eq!(actions[1].end_time, "11:45");
    }

    #[test]
    fn details_without_matching_rows_yield_empty_itinerary() {
        let actions = parse_details("<table><tbody><tr class=\"other\"></tr></tbody></table>");
        assert!(actions.is_empty());
    }
}
