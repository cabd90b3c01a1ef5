/// Calendar titles that mark days off, leave and other non-duty entries.
const NON_WORK_TITLES: [&str; 9] = ["DWS", "DW5", "DWŚ", "T", "KREW", "N", "C", "C5", "W"];

/// Title the crew calendar uses for training sessions.
const TRAINING_TITLE: &str = "VS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Work,
    Training,
    NonWork,
}

/// Removes the trailing "*" marking a provisional or modified duty.
pub fn strip_provisional(title: &str) -> &str {
    title.trim_end_matches('*')
}

/// Decides what a calendar title denotes. Total: every title maps to
/// exactly one kind, unrecognized titles count as work duties.
pub fn classify(title: &str) -> ShiftKind {
    let title = strip_provisional(title);
    if title == TRAINING_TITLE {
        return ShiftKind::Training;
    }
    if NON_WORK_TITLES.contains(&title) {
        return ShiftKind::NonWork;
    }
    ShiftKind::Work
}
