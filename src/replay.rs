use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::ScheduleError;
use crate::schedule::{AssignmentEngine, ProgramKey};

/// One recorded grid edit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddDay {
        date: String,
    },
    RemoveDay {
        date: String,
    },
    Assign {
        program: String,
        year: u32,
        date: String,
        slot: String,
        #[serde(default, rename = "subjectId", alias = "subject_id")]
        subject_id: String,
    },
    Unassign {
        program: String,
        year: u32,
        date: String,
        slot: String,
    },
}

/// What happened while replaying a list of operations
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub applied: usize,
    /// Rejected assignments, as the message shown to the user
    pub conflicts: Vec<String>,
}

pub fn read_operations(path: &Path) -> Result<Vec<Operation>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Applies operations in order
///
/// Conflicts are collected and skipped, as they would be on the grid; any other
/// error stops the replay.
pub fn apply_operations(engine: &mut AssignmentEngine, operations: &[Operation]) -> Result<ReplayReport, ScheduleError> {
    let mut report = ReplayReport::default();

    for operation in operations {
        let result = match operation {
            Operation::AddDay { date } => engine.add_day(date).map(|_| ()),
            Operation::RemoveDay { date } => engine.remove_day(date).map(|_| ()),
            Operation::Assign { program, year, date, slot, subject_id } => {
                let cell = engine.cell(date, slot)?;
                engine.assign(&ProgramKey::new(program.clone(), *year), cell, subject_id)
            }
            Operation::Unassign { program, year, date, slot } => {
                let cell = engine.cell(date, slot)?;
                engine.unassign(&ProgramKey::new(program.clone(), *year), cell).map(|_| ())
            }
        };

        match result {
            Ok(()) => report.applied += 1,
            Err(e @ ScheduleError::Conflict { .. }) => {
                warn!(error = %e, "skipping conflicting assignment");
                report.conflicts.push(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
