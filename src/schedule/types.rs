use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::slot_utils::{format_day, TimeSlot};

/// Identity of a program: course name plus year level
///
/// Ordering is by name, then by year, which is the order programs are listed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramKey {
    pub program: String,
    pub year: u32,
}

impl ProgramKey {
    pub fn new(program: impl Into<String>, year: u32) -> Self {
        Self {
            program: program.into(),
            year,
        }
    }
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.program, self.year)
    }
}

/// One offering of a subject under a program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCode {
    pub code_no: String,
    pub program: String,
    pub year: u32,
    pub dept: String,
}

/// A subject with every offering it appears under
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub subject_id: String,
    pub subject_title: String,
    pub codes: Vec<SubjectCode>,
}

/// A subject as listed by one program (first offering wins for title and code)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSubject {
    pub subject_id: String,
    pub subject_title: String,
    pub code_no: String,
}

/// A program and the subjects it has to place; its schedule lives in the store
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub key: ProgramKey,
    pub dept: String,
    pub subjects: Vec<ProgramSubject>,
}

impl Program {
    pub fn offers(&self, subject_id: &str) -> bool {
        self.subjects.iter().any(|s| s.subject_id == subject_id)
    }

    pub fn subject(&self, subject_id: &str) -> Option<&ProgramSubject> {
        self.subjects.iter().find(|s| s.subject_id == subject_id)
    }

    /// True when the program belongs to `dept` (case-insensitive)
    pub fn in_dept(&self, dept: &str) -> bool {
        !self.dept.is_empty() && self.dept.eq_ignore_ascii_case(dept)
    }
}

/// A (day, time slot) key into a program's schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub day: NaiveDate,
    pub slot: TimeSlot,
}

impl Cell {
    pub fn new(day: NaiveDate, slot: TimeSlot) -> Self {
        Self { day, slot }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", format_day(self.day), self.slot)
    }
}
