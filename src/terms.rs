use serde::Serialize;

use crate::error::ScheduleError;

/// Term kinds as (key, label); the key is the last digit of a term code
pub const TERM_KINDS: [(u8, &str); 3] = [(1, "1st Term"), (2, "2nd Term"), (3, "Summer")];

/// A selectable term/year, e.g. label "1st Term 2025-2026", value "2025261"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermOption {
    pub label: String,
    pub value: String,
}

/// Term options for the school years starting one year before through one year after `current_year`
pub fn term_options(current_year: i32) -> Vec<TermOption> {
    let mut options = Vec::new();
    for year in (current_year - 1)..=(current_year + 1) {
        let next_year = year + 1;
        for (key, label) in TERM_KINDS {
            options.push(TermOption {
                label: format!("{} {}-{}", label, year, next_year),
                value: format!("{}{:02}{}", year, next_year.rem_euclid(100), key),
            });
        }
    }
    options
}

/// Validates the selected term before offerings are loaded
pub fn validate_term(term: &str) -> Result<&str, ScheduleError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ScheduleError::NoTermSelected);
    }
    Ok(term)
}
