use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use super::slot_utils::TimeSlot;
use super::types::Cell;

/// Per-program cell assignments plus the indexes that keep lookups cheap
///
/// Programs are addressed by their position in the catalog. The store does not
/// enforce the placement rules on its own; [`super::AssignmentEngine`] decides
/// what gets written.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScheduleStore {
    schedules: Vec<HashMap<Cell, Option<String>>>,
    /// subject id -> the one cell it occupies
    placements: HashMap<String, Cell>,
    /// cell -> subject most recently placed there
    last_occupants: HashMap<Cell, String>,
}

impl ScheduleStore {
    pub fn new(program_count: usize) -> Self {
        Self {
            schedules: vec![HashMap::new(); program_count],
            placements: HashMap::new(),
            last_occupants: HashMap::new(),
        }
    }

    /// Adds empty cells for every slot of `day` to every program
    pub fn seed_day(&mut self, day: NaiveDate) {
        for schedule in &mut self.schedules {
            for slot in TimeSlot::all() {
                schedule.entry(Cell::new(day, slot)).or_insert(None);
            }
        }
    }

    /// Removes every cell of `day` from every program and forgets what sat there
    pub fn drop_day(&mut self, day: NaiveDate) -> Vec<String> {
        for schedule in &mut self.schedules {
            schedule.retain(|cell, _| cell.day != day);
        }
        self.last_occupants.retain(|cell, _| cell.day != day);

        let mut freed = Vec::new();
        self.placements.retain(|subject_id, cell| {
            if cell.day == day {
                freed.push(subject_id.clone());
                false
            } else {
                true
            }
        });
        freed.sort();
        freed
    }

    pub fn has_cell(&self, program: usize, cell: &Cell) -> bool {
        self.schedules
            .get(program)
            .map_or(false, |s| s.contains_key(cell))
    }

    pub fn get(&self, program: usize, cell: &Cell) -> Option<&str> {
        self.schedules
            .get(program)
            .and_then(|s| s.get(cell))
            .and_then(|v| v.as_deref())
    }

    pub fn placement(&self, subject_id: &str) -> Option<Cell> {
        self.placements.get(subject_id).copied()
    }

    pub fn last_occupant(&self, cell: &Cell) -> Option<&str> {
        self.last_occupants.get(cell).map(String::as_str)
    }

    /// Writes `subject_id` into `cell` for each program in `holders`
    pub fn place(&mut self, subject_id: &str, cell: Cell, holders: &[usize]) {
        for &program in holders {
            if let Some(schedule) = self.schedules.get_mut(program) {
                schedule.insert(cell, Some(subject_id.to_string()));
            }
        }
        self.placements.insert(subject_id.to_string(), cell);
        self.last_occupants.insert(cell, subject_id.to_string());
    }

    /// Clears `subject_id` from `cell` wherever it sits; returns how many programs changed
    pub fn release(&mut self, subject_id: &str, cell: Cell) -> usize {
        let mut cleared = 0;
        for schedule in &mut self.schedules {
            if let Some(value) = schedule.get_mut(&cell) {
                if value.as_deref() == Some(subject_id) {
                    *value = None;
                    cleared += 1;
                }
            }
        }
        if self.placements.get(subject_id) == Some(&cell) {
            self.placements.remove(subject_id);
        }
        cleared
    }

    /// Drops the recorded occupant of `cell` if it is `subject_id`
    pub fn forget_occupant(&mut self, cell: &Cell, subject_id: &str) {
        if self.last_occupants.get(cell).map(String::as_str) == Some(subject_id) {
            self.last_occupants.remove(cell);
        }
    }

    /// Number of distinct subjects placed anywhere in a program's schedule
    pub fn assigned_count(&self, program: usize) -> usize {
        self.schedules.get(program).map_or(0, |s| {
            s.values()
                .filter_map(|v| v.as_deref())
                .collect::<HashSet<&str>>()
                .len()
        })
    }

    /// Every non-empty cell across all programs, as (program, cell, subject)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Cell, &str)> + '_ {
        self.schedules.iter().enumerate().flat_map(|(program, schedule)| {
            schedule
                .iter()
                .filter_map(move |(cell, v)| v.as_deref().map(|s| (program, *cell, s)))
        })
    }

    pub fn cell_count(&self, program: usize) -> usize {
        self.schedules.get(program).map_or(0, HashMap::len)
    }
}
