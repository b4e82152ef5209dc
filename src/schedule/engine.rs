use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::ScheduleError;

use super::days::ActiveDays;
use super::{format_day, parse_day, TimeSlot};
use super::store::ScheduleStore;
use super::types::{Cell, Program, ProgramKey, ProgramSubject};

/// The only mutation surface over the timetable
///
/// Owns the catalog of one data load, the active days and the per-program
/// schedules. Every public mutation leaves the schedules in a state where:
/// - a subject occupies at most one cell, and every program offering it holds
///   it in that same cell,
/// - programs only hold subjects they offer,
/// - cells exist exactly for the active days,
/// - each program's remaining count equals its subject count minus the
///   distinct subjects in its schedule.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    catalog: Catalog,
    store: ScheduleStore,
    days: ActiveDays,
    remaining: Vec<usize>,
}

impl AssignmentEngine {
    pub fn new(catalog: Catalog) -> Self {
        let store = ScheduleStore::new(catalog.programs.len());
        let remaining = catalog.programs.iter().map(|p| p.subjects.len()).collect();
        Self {
            catalog,
            store,
            days: ActiveDays::default(),
            remaining,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn programs(&self) -> &[Program] {
        &self.catalog.programs
    }

    /// Programs shown on the editable grid, i.e. all except those of `excluded_dept`
    pub fn visible_programs<'a>(&'a self, excluded_dept: &'a str) -> impl Iterator<Item = (usize, &'a Program)> + 'a {
        self.catalog
            .programs
            .iter()
            .enumerate()
            .filter(move |(_, p)| excluded_dept.is_empty() || !p.in_dept(excluded_dept))
    }

    pub fn active_days(&self) -> &[NaiveDate] {
        self.days.as_slice()
    }

    /// Activates a day and seeds its empty cells in every program
    ///
    /// Returns false if the day was already active.
    pub fn add_day(&mut self, date: &str) -> Result<bool, ScheduleError> {
        let day = parse_day(date)?;
        if !self.days.insert(day) {
            debug!(day = %format_day(day), "day already active");
            return Ok(false);
        }

        self.store.seed_day(day);
        self.refresh_remaining();
        info!(day = %format_day(day), "day added");
        Ok(true)
    }

    /// Deactivates a day and deletes its cells from every program
    ///
    /// Subjects placed on that day become free for placement elsewhere.
    pub fn remove_day(&mut self, date: &str) -> Result<Vec<String>, ScheduleError> {
        let day = parse_day(date)?;
        if !self.days.remove(day) {
            return Err(ScheduleError::UnknownDay(format_day(day)));
        }

        let freed = self.store.drop_day(day);
        self.refresh_remaining();
        info!(day = %format_day(day), freed = freed.len(), "day removed");
        Ok(freed)
    }

    /// Resolves a (date, slot label) pair to a cell of an active day
    pub fn cell(&self, date: &str, slot: &str) -> Result<Cell, ScheduleError> {
        let cell = Cell::new(parse_day(date)?, TimeSlot::parse(slot)?);
        self.require_cell(&cell)?;
        Ok(cell)
    }

    /// Places a subject into a cell for `program` and every program sharing it
    ///
    /// An empty `subject_id` clears the cell instead. A subject already held in a
    /// different cell is rejected with [`ScheduleError::Conflict`] and nothing
    /// changes. Placing a subject where it already sits is accepted as is.
    pub fn assign(&mut self, program: &ProgramKey, cell: Cell, subject_id: &str) -> Result<(), ScheduleError> {
        if subject_id.is_empty() {
            self.unassign(program, cell)?;
            return Ok(());
        }

        let index = self.program_index(program)?;
        self.require_cell(&cell)?;
        if !self.catalog.programs[index].offers(subject_id) {
            return Err(ScheduleError::SubjectNotOffered {
                subject_id: subject_id.to_string(),
                program: program.clone(),
            });
        }

        if let Some(held_at) = self.store.placement(subject_id) {
            if held_at != cell {
                warn!(subject_id, %held_at, attempted = %cell, "subject already assigned in another slot");
                return Err(ScheduleError::Conflict {
                    subject_id: subject_id.to_string(),
                    held_at,
                    attempted: cell,
                });
            }
        }

        let holders: Vec<usize> = self
            .catalog
            .programs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.offers(subject_id))
            .map(|(i, _)| i)
            .collect();

        // Whatever the holders had in this cell is replaced, and released everywhere
        // so that no program keeps a copy of it behind.
        let displaced: BTreeSet<String> = holders
            .iter()
            .filter_map(|&p| self.store.get(p, &cell))
            .filter(|s| *s != subject_id)
            .map(str::to_string)
            .collect();
        for old in &displaced {
            let cleared = self.store.release(old, cell);
            self.store.forget_occupant(&cell, old);
            debug!(subject_id = %old, %cell, cleared, "displaced by new assignment");
        }

        self.store.place(subject_id, cell, &holders);
        self.refresh_remaining();
        info!(subject_id, %cell, programs = holders.len(), "subject assigned");
        Ok(())
    }

    /// Clears a cell for `program`, removing the occupant from that cell in every program
    ///
    /// Returns the subject that was removed; clearing an empty cell changes nothing.
    pub fn unassign(&mut self, program: &ProgramKey, cell: Cell) -> Result<Option<String>, ScheduleError> {
        let index = self.program_index(program)?;
        self.require_cell(&cell)?;

        // The program's own value decides what is cleared: the cell's recorded
        // occupant may belong to another program using the same cell.
        let Some(subject_id) = self.store.get(index, &cell).map(str::to_string) else {
            debug!(%program, %cell, "cell already empty");
            return Ok(None);
        };

        let cleared = self.store.release(&subject_id, cell);
        self.store.forget_occupant(&cell, &subject_id);
        self.refresh_remaining();
        info!(subject_id = %subject_id, %cell, cleared, "subject unassigned");
        Ok(Some(subject_id))
    }

    /// Subjects of `program` that may go into `cell`
    ///
    /// Leaves out subjects placed in any other cell; one already sitting in
    /// `cell` stays listed.
    pub fn available_subjects(&self, program: &ProgramKey, cell: Cell) -> Result<Vec<&ProgramSubject>, ScheduleError> {
        let index = self.program_index(program)?;
        self.require_cell(&cell)?;

        Ok(self.catalog.programs[index]
            .subjects
            .iter()
            .filter(|s| match self.store.placement(&s.subject_id) {
                Some(held_at) => held_at == cell,
                None => true,
            })
            .collect())
    }

    /// Subjects of `program` not yet placed in any cell
    pub fn remaining_count(&self, program: &ProgramKey) -> Result<usize, ScheduleError> {
        let index = self.program_index(program)?;
        Ok(self.remaining[index])
    }

    pub fn remaining_at(&self, index: usize) -> usize {
        self.remaining.get(index).copied().unwrap_or(0)
    }

    pub fn assigned_at(&self, program: &ProgramKey, cell: Cell) -> Result<Option<&str>, ScheduleError> {
        let index = self.program_index(program)?;
        self.require_cell(&cell)?;
        Ok(self.store.get(index, &cell))
    }

    /// The cell a subject currently occupies, if any
    pub fn placement(&self, subject_id: &str) -> Option<Cell> {
        self.store.placement(subject_id)
    }

    /// The subject most recently placed into `cell` and still recorded there
    pub fn last_occupant(&self, cell: &Cell) -> Option<&str> {
        self.store.last_occupant(cell)
    }

    /// A program's assignments on one day, in slot order
    pub fn day_assignments(&self, index: usize, day: NaiveDate) -> Vec<(TimeSlot, &ProgramSubject)> {
        let Some(program) = self.catalog.programs.get(index) else {
            return Vec::new();
        };

        ActiveDays::cells(day)
            .filter_map(|cell| {
                let subject_id = self.store.get(index, &cell)?;
                program.subject(subject_id).map(|s| (cell.slot, s))
            })
            .collect()
    }

    /// Every non-empty cell across all programs, as (program index, cell, subject id)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Cell, &str)> + '_ {
        self.store.occupied()
    }

    fn program_index(&self, program: &ProgramKey) -> Result<usize, ScheduleError> {
        self.catalog
            .program_index(program)
            .ok_or_else(|| ScheduleError::UnknownProgram(program.clone()))
    }

    fn require_cell(&self, cell: &Cell) -> Result<(), ScheduleError> {
        if self.days.contains(cell.day) {
            Ok(())
        } else {
            Err(ScheduleError::UnknownDay(format_day(cell.day)))
        }
    }

    fn refresh_remaining(&mut self) {
        self.remaining = self
            .catalog
            .programs
            .iter()
            .enumerate()
            .map(|(i, p)| p.subjects.len().saturating_sub(self.store.assigned_count(i)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::OfferingRecord;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    const DAY: &str = "2025-06-02";
    const FIRST: &str = "7:30 AM-9:00 AM";
    const SECOND: &str = "9:00 AM-10:30 AM";

    fn record(subject_id: &str, course: &str, year: u32, dept: &str) -> OfferingRecord {
        OfferingRecord {
            subject_id: subject_id.to_string(),
            subject_title: format!("{} title", subject_id),
            code_no: format!("{}-{}", subject_id, course),
            course: course.to_string(),
            year_level: year,
            dept: dept.to_string(),
        }
    }

    fn engine(records: &[OfferingRecord]) -> AssignmentEngine {
        AssignmentEngine::new(Catalog::from_records(records))
    }

    fn bscs() -> ProgramKey {
        ProgramKey::new("BSCS", 1)
    }

    fn bsit() -> ProgramKey {
        ProgramKey::new("BSIT", 1)
    }

    /// Checks global uniqueness, membership and the remaining counts
    fn assert_invariants(engine: &AssignmentEngine) {
        let mut seen: HashMap<&str, Cell> = HashMap::new();
        for (index, cell, subject_id) in engine.occupied() {
            assert!(engine.programs()[index].offers(subject_id), "{} not offered", subject_id);
            if let Some(other) = seen.insert(subject_id, cell) {
                assert_eq!(other, cell, "{} in two cells", subject_id);
            }
        }
        for (subject_id, cell) in &seen {
            assert_eq!(engine.placement(subject_id), Some(*cell));
            for program in engine.programs().iter().filter(|p| p.offers(subject_id)) {
                assert_eq!(engine.assigned_at(&program.key, *cell).unwrap(), Some(*subject_id));
            }
        }
        for (index, program) in engine.programs().iter().enumerate() {
            let distinct: HashSet<&str> = engine
                .occupied()
                .filter(|(i, _, _)| *i == index)
                .map(|(_, _, s)| s)
                .collect();
            assert_eq!(
                engine.remaining_count(&program.key).unwrap(),
                program.subjects.len() - distinct.len()
            );
        }
    }

    #[test]
    fn shared_subject_scenario() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("MATH1", "BSIT", 1, "")]);
        assert!(engine.add_day(DAY).unwrap());

        let first = engine.cell(DAY, FIRST).unwrap();
        let second = engine.cell(DAY, SECOND).unwrap();

        engine.assign(&bscs(), first, "MATH1").unwrap();
        assert_eq!(engine.assigned_at(&bscs(), first).unwrap(), Some("MATH1"));
        assert_eq!(engine.assigned_at(&bsit(), first).unwrap(), Some("MATH1"));
        assert_eq!(engine.remaining_count(&bscs()).unwrap(), 0);
        assert_eq!(engine.remaining_count(&bsit()).unwrap(), 0);

        let err = engine.assign(&bsit(), second, "MATH1").unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Conflict { ref subject_id, held_at, attempted }
                if subject_id == "MATH1" && held_at == first && attempted == second
        ));
        assert_eq!(engine.assigned_at(&bsit(), second).unwrap(), None);
        assert_eq!(engine.assigned_at(&bsit(), first).unwrap(), Some("MATH1"));
        assert_eq!(engine.remaining_count(&bsit()).unwrap(), 0);

        assert_eq!(engine.unassign(&bscs(), first).unwrap(), Some("MATH1".to_string()));
        assert_eq!(engine.assigned_at(&bscs(), first).unwrap(), None);
        assert_eq!(engine.assigned_at(&bsit(), first).unwrap(), None);
        assert_eq!(engine.remaining_count(&bscs()).unwrap(), 1);
        assert_eq!(engine.remaining_count(&bsit()).unwrap(), 1);
        assert_invariants(&engine);
    }

    #[test]
    fn propagation_stays_within_sharing_programs() {
        let mut engine = engine(&[
            record("MATH1", "BSCS", 1, ""),
            record("MATH1", "BSIT", 1, ""),
            record("ENG1", "BSED", 2, ""),
        ]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();

        engine.assign(&bsit(), first, "MATH1").unwrap();
        let bsed = ProgramKey::new("BSED", 2);
        assert_eq!(engine.assigned_at(&bsed, first).unwrap(), None);
        assert_eq!(engine.remaining_count(&bsed).unwrap(), 1);
        assert_eq!(engine.occupied().count(), 2);
        assert_invariants(&engine);
    }

    #[test]
    fn reassigning_same_cell_is_idempotent() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("MATH1", "BSIT", 1, "")]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();

        engine.assign(&bscs(), first, "MATH1").unwrap();
        engine.assign(&bsit(), first, "MATH1").unwrap();
        engine.assign(&bscs(), first, "MATH1").unwrap();
        assert_eq!(engine.occupied().count(), 2);
        assert_eq!(engine.remaining_count(&bscs()).unwrap(), 0);
        assert_invariants(&engine);
    }

    #[test]
    fn unassigning_empty_cell_is_noop() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("ENG1", "BSIT", 1, "")]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        let second = engine.cell(DAY, SECOND).unwrap();
        engine.assign(&bsit(), first, "ENG1").unwrap();

        assert_eq!(engine.unassign(&bscs(), first).unwrap(), None);
        assert_eq!(engine.unassign(&bscs(), second).unwrap(), None);
        assert_eq!(engine.assigned_at(&bsit(), first).unwrap(), Some("ENG1"));
        assert_eq!(engine.last_occupant(&first), Some("ENG1"));
        assert_eq!(engine.remaining_count(&bsit()).unwrap(), 0);
        assert_invariants(&engine);
    }

    #[test]
    fn empty_subject_id_unassigns() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("MATH1", "BSIT", 1, "")]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        engine.assign(&bscs(), first, "MATH1").unwrap();

        engine.assign(&bsit(), first, "").unwrap();
        assert_eq!(engine.occupied().count(), 0);
        assert_eq!(engine.placement("MATH1"), None);
        assert_eq!(engine.last_occupant(&first), None);
    }

    #[test]
    fn unassign_clears_own_subject_when_cell_shared_by_others() {
        // Two programs with nothing in common use the same cell
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("ENG1", "BSIT", 1, "")]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();

        engine.assign(&bscs(), first, "MATH1").unwrap();
        engine.assign(&bsit(), first, "ENG1").unwrap();
        assert_eq!(engine.last_occupant(&first), Some("ENG1"));

        assert_eq!(engine.unassign(&bscs(), first).unwrap(), Some("MATH1".to_string()));
        assert_eq!(engine.assigned_at(&bsit(), first).unwrap(), Some("ENG1"));
        assert_eq!(engine.last_occupant(&first), Some("ENG1"));
        assert_eq!(engine.remaining_count(&bscs()).unwrap(), 1);
        assert_eq!(engine.remaining_count(&bsit()).unwrap(), 0);
        assert_invariants(&engine);
    }

    #[test]
    fn overwriting_a_cell_releases_previous_subject_everywhere() {
        let mut engine = engine(&[
            record("MATH1", "BSCS", 1, ""),
            record("MATH1", "BSIT", 1, ""),
            record("ENG1", "BSCS", 1, ""),
        ]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        let second = engine.cell(DAY, SECOND).unwrap();

        engine.assign(&bscs(), first, "MATH1").unwrap();
        engine.assign(&bscs(), first, "ENG1").unwrap();

        assert_eq!(engine.assigned_at(&bscs(), first).unwrap(), Some("ENG1"));
        assert_eq!(engine.assigned_at(&bsit(), first).unwrap(), None);
        assert_eq!(engine.placement("MATH1"), None);
        // MATH1 is free again
        engine.assign(&bsit(), second, "MATH1").unwrap();
        assert_eq!(engine.assigned_at(&bscs(), second).unwrap(), Some("MATH1"));
        assert_invariants(&engine);
    }

    #[test]
    fn subject_must_be_offered() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("ENG1", "BSIT", 1, "")]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();

        let err = engine.assign(&bscs(), first, "ENG1").unwrap_err();
        assert!(matches!(err, ScheduleError::SubjectNotOffered { .. }));
        // ids are case sensitive
        assert!(engine.assign(&bscs(), first, "math1").is_err());
        assert_eq!(engine.occupied().count(), 0);
    }

    #[test]
    fn unknown_program_and_inactive_day_fail_fast() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, "")]);
        assert!(matches!(engine.cell(DAY, FIRST), Err(ScheduleError::UnknownDay(_))));

        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        assert!(matches!(
            engine.assign(&ProgramKey::new("BSCS", 2), first, "MATH1"),
            Err(ScheduleError::UnknownProgram(_))
        ));
        assert!(matches!(engine.cell(DAY, "8:00 PM-9:00 PM"), Err(ScheduleError::UnknownSlot(_))));
        assert!(matches!(engine.cell("not a day", FIRST), Err(ScheduleError::InvalidDate { .. })));

        let stale = Cell::new(parse_day("2025-06-03").unwrap(), first.slot);
        assert!(matches!(engine.assign(&bscs(), stale, "MATH1"), Err(ScheduleError::UnknownDay(_))));
        assert!(matches!(engine.remove_day("2025-06-03"), Err(ScheduleError::UnknownDay(_))));
    }

    #[test]
    fn available_subjects_hides_subjects_placed_elsewhere() {
        let mut engine = engine(&[
            record("MATH1", "BSCS", 1, ""),
            record("ENG1", "BSCS", 1, ""),
            record("PE1", "BSCS", 1, ""),
            record("MATH1", "BSIT", 1, ""),
        ]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        let second = engine.cell(DAY, SECOND).unwrap();

        engine.assign(&bsit(), first, "MATH1").unwrap();
        engine.assign(&bscs(), second, "ENG1").unwrap();

        let ids = |cell| -> Vec<String> {
            engine
                .available_subjects(&bscs(), cell)
                .unwrap()
                .iter()
                .map(|s| s.subject_id.clone())
                .collect()
        };
        assert_eq!(ids(first), vec!["MATH1", "PE1"]);
        assert_eq!(ids(second), vec!["ENG1", "PE1"]);
    }

    #[test]
    fn add_day_is_idempotent_and_keeps_order() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, "")]);
        assert!(engine.add_day("2025-06-09").unwrap());
        assert!(engine.add_day("06/02/2025").unwrap());
        assert!(!engine.add_day("2025-06-09").unwrap());

        let days: Vec<String> = engine.active_days().iter().map(|d| format_day(*d)).collect();
        assert_eq!(days, vec!["2025-06-09", "2025-06-02"]);
    }

    #[test]
    fn add_day_does_not_disturb_existing_assignments() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, "")]);
        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        engine.assign(&bscs(), first, "MATH1").unwrap();

        engine.add_day("2025-06-03").unwrap();
        assert_eq!(engine.assigned_at(&bscs(), first).unwrap(), Some("MATH1"));
        assert_eq!(engine.remaining_count(&bscs()).unwrap(), 0);
    }

    #[test]
    fn remove_day_cascades_and_frees_subjects() {
        let mut engine = engine(&[
            record("MATH1", "BSCS", 1, ""),
            record("MATH1", "BSIT", 1, ""),
            record("ENG1", "BSIT", 1, ""),
        ]);
        engine.add_day(DAY).unwrap();
        engine.add_day("2025-06-03").unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        let next_day = engine.cell("2025-06-03", SECOND).unwrap();

        engine.assign(&bscs(), first, "MATH1").unwrap();
        engine.assign(&bsit(), next_day, "ENG1").unwrap();

        let freed = engine.remove_day(DAY).unwrap();
        assert_eq!(freed, vec!["MATH1".to_string()]);
        assert!(matches!(engine.assigned_at(&bscs(), first), Err(ScheduleError::UnknownDay(_))));
        assert_eq!(engine.remaining_count(&bscs()).unwrap(), 1);
        assert_eq!(engine.remaining_count(&bsit()).unwrap(), 1);
        assert_eq!(engine.assigned_at(&bsit(), next_day).unwrap(), Some("ENG1"));

        let elsewhere = engine.cell("2025-06-03", FIRST).unwrap();
        engine.assign(&bsit(), elsewhere, "MATH1").unwrap();
        assert_eq!(engine.assigned_at(&bscs(), elsewhere).unwrap(), Some("MATH1"));
        assert_invariants(&engine);
    }

    #[test]
    fn excluded_department_is_hidden_but_still_propagated() {
        let mut engine = engine(&[
            record("MATH1", "BSCS", 1, "CCS"),
            record("MATH1", "ABPSY", 1, "sas"),
        ]);
        let visible: Vec<String> = engine.visible_programs("SAS").map(|(_, p)| p.key.to_string()).collect();
        assert_eq!(visible, vec!["BSCS-1"]);
        assert_eq!(engine.visible_programs("").count(), 2);

        engine.add_day(DAY).unwrap();
        let first = engine.cell(DAY, FIRST).unwrap();
        engine.assign(&bscs(), first, "MATH1").unwrap();
        let hidden = ProgramKey::new("ABPSY", 1);
        assert_eq!(engine.assigned_at(&hidden, first).unwrap(), Some("MATH1"));

        let second = engine.cell(DAY, SECOND).unwrap();
        assert!(matches!(engine.assign(&hidden, second, "MATH1"), Err(ScheduleError::Conflict { .. })));
    }

    #[test]
    fn day_assignments_in_slot_order() {
        let mut engine = engine(&[record("MATH1", "BSCS", 1, ""), record("ENG1", "BSCS", 1, "")]);
        engine.add_day(DAY).unwrap();
        engine.assign(&bscs(), engine.cell(DAY, SECOND).unwrap(), "MATH1").unwrap();
        engine.assign(&bscs(), engine.cell(DAY, FIRST).unwrap(), "ENG1").unwrap();

        let day = parse_day(DAY).unwrap();
        let row: Vec<(&str, &str)> = engine
            .day_assignments(0, day)
            .into_iter()
            .map(|(slot, s)| (slot.label(), s.subject_id.as_str()))
            .collect();
        assert_eq!(row, vec![(FIRST, "ENG1"), (SECOND, "MATH1")]);
        assert!(engine.day_assignments(5, day).is_empty());
    }

    #[test]
    fn random_edit_sequences_keep_invariants() {
        let subjects = ["MATH1", "ENG1", "PE1", "NSTP1", "CS101", "IT101"];
        let programs = [("BSCS", 1), ("BSIT", 1), ("BSCS", 2), ("ABPSY", 1)];
        let mut records = Vec::new();
        for (i, (course, year)) in programs.iter().enumerate() {
            for (j, subject) in subjects.iter().enumerate() {
                if (i + j) % 3 != 0 {
                    records.push(record(subject, course, *year, ""));
                }
            }
        }
        let mut engine = engine(&records);
        let dates = ["2025-06-02", "2025-06-03", "2025-06-04"];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let (course, year) = programs[rng.gen_range(0..programs.len())];
            let key = ProgramKey::new(course, year);
            let date = dates[rng.gen_range(0..dates.len())];
            let slot = TimeSlot::all().nth(rng.gen_range(0..8)).unwrap();

            match rng.gen_range(0..10) {
                0 => {
                    engine.add_day(date).unwrap();
                }
                1 => {
                    let _ = engine.remove_day(date);
                }
                op => {
                    if engine.add_day(date).is_ok() {
                        let cell = Cell::new(parse_day(date).unwrap(), slot);
                        if op < 4 {
                            engine.unassign(&key, cell).unwrap();
                        } else {
                            let subject = subjects[rng.gen_range(0..subjects.len())];
                            match engine.assign(&key, cell, subject) {
                                Ok(())
                                | Err(ScheduleError::Conflict { .. })
                                | Err(ScheduleError::SubjectNotOffered { .. }) => {}
                                Err(e) => panic!("unexpected error {}", e),
                            }
                        }
                    }
                }
            }
            assert_invariants(&engine);
        }
    }
}
