use chrono::NaiveDate;

use super::slot_utils::TimeSlot;
use super::types::Cell;

/// Calendar days currently on the grid, in the order they were picked
#[derive(Debug, Clone, Default)]
pub struct ActiveDays {
    days: Vec<NaiveDate>,
}

impl ActiveDays {
    /// Returns false if the day was already active
    pub fn insert(&mut self, day: NaiveDate) -> bool {
        if self.contains(day) {
            return false;
        }
        self.days.push(day);
        true
    }

    /// Returns false if the day was not active
    pub fn remove(&mut self, day: NaiveDate) -> bool {
        let before = self.days.len();
        self.days.retain(|d| *d != day);
        self.days.len() != before
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The cells of one day in slot order
    pub fn cells(day: NaiveDate) -> impl Iterator<Item = Cell> {
        TimeSlot::all().map(move |slot| Cell::new(day, slot))
    }
}
