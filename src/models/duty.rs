use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel id for shifts that have no portal record, e.g. training sessions.
pub const UNDEFINED_DUTY_ID: &str = "UNDEFINED";

/// One itinerary leg of a duty. Any field may be empty when the portal
/// table omits the matching column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub train: String,
    pub name: String,
    pub start_location: String,
    pub start_time: String,
    pub end_location: String,
    pub end_time: String,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = format!(
            "{} {}, {} {}->{} {}",
            self.train, self.name, self.start_location, self.start_time, self.end_location, self.end_time
        );
        write!(f, "{}", line.trim().replace('\n', "|||"))
    }
}

/// One resolved shift: the portal-assigned id, the calendar title and the
/// itinerary in parse order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duty {
    pub id: String,
    pub title: String,
    pub actions: Vec<Action>,
}

impl Duty {
    pub fn new(id: String, title: String, actions: Vec<Action>) -> Self {
        Self { id, title, actions }
    }

    /// Training sessions have no portal record by design.
    pub fn training(title: &str) -> Self {
        Self {
            id: UNDEFINED_DUTY_ID.to_string(),
            title: title.to_string(),
            actions: Vec::new(),
        }
    }

    /// Human-readable itinerary, one action per line.
    pub fn event_description(&self) -> String {
        self.actions
            .iter()
            .map(|action| action.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg() -> Action {
        Action {
            train: "IC100".to_string(),
            name: "Jazda".to_string(),
            start_location: "Katowice".to_string(),
            start_time: "08:00".to_string(),
            end_location: "Kraków".to_string(),
            end_time: "09:30".to_string(),
        }
    }

    #[test]
    fn action_line_format() {
        assert_eq!(leg().to_string(), "IC100 Jazda, Katowice 08:00->Kraków 09:30");
    }

    #[test]
    fn action_line_replaces_embedded_newlines() {
        let mut action = leg();
        action.train = "IC100\nIC101".to_string();
        assert_eq!(
            action.to_string(),
            "IC100|||IC101 Jazda, Katowice 08:00->Kraków 09:30"
        );
    }

    #[test]
    fn description_joins_actions_in_order() {
        let mut second = leg();
        second.train = "IC200".to_string();
        let duty = Duty::new("4711".to_string(), "T123".to_string(), vec![leg(), second]);
        let description = duty.event_description();
        let lines: Vec<&str> = description.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("IC100"));
        assert!(lines[1].starts_with("IC200"));
    }

    #[test]
    fn training_duty_uses_sentinel_id() {
        let duty = Duty::training("VS");
        assert_eq!(duty.id, UNDEFINED_DUTY_ID);
        assert!(duty.actions.is_empty());
        assert_eq!(duty.event_description(), "");
    }
}
