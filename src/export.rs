use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::schedule::{format_day, AssignmentEngine};

/// One placed subject in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAssignment {
    pub subject_id: String,
    pub subject_title: String,
    pub code_no: String,
    pub slot_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    pub program: String,
    pub year: u32,
    pub subjects: Vec<SlotAssignment>,
}

/// Everything scheduled on one day, for every visible program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: String,
    pub programs: Vec<ProgramSnapshot>,
}

/// Read-only projection of the schedule for saving or previewing
///
/// Days come in selection order, programs in catalog order (without
/// `excluded_dept`), subjects in slot order.
pub fn build_snapshot(engine: &AssignmentEngine, excluded_dept: &str) -> Vec<DaySnapshot> {
    engine
        .active_days()
        .iter()
        .map(|&day| DaySnapshot {
            date: format_day(day),
            programs: engine
                .visible_programs(excluded_dept)
                .map(|(index, program)| ProgramSnapshot {
                    program: program.key.program.clone(),
                    year: program.key.year,
                    subjects: engine
                        .day_assignments(index, day)
                        .into_iter()
                        .map(|(slot, subject)| SlotAssignment {
                            subject_id: subject.subject_id.clone(),
                            subject_title: subject.subject_title.clone(),
                            code_no: subject.code_no.clone(),
                            slot_label: slot.label().to_string(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Writes the snapshot as pretty JSON
pub fn write_snapshot_json(snapshot: &[DaySnapshot], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}

/// Writes the snapshot as one CSV row per placed subject
pub fn write_snapshot_csv(snapshot: &[DaySnapshot], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(path)?;
    wtr.write_record(["date", "program", "year", "slot", "subjectId", "subjectTitle", "codeNo"])?;

    for day in snapshot {
        for program in &day.programs {
            let year = program.year.to_string();
            for subject in &program.subjects {
                wtr.write_record([
                    day.date.as_str(),
                    program.program.as_str(),
                    year.as_str(),
                    subject.slot_label.as_str(),
                    subject.subject_id.as_str(),
                    subject.subject_title.as_str(),
                    subject.code_no.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the snapshot as CSV when `path` ends in `.csv`, JSON otherwise
pub fn write_snapshot(snapshot: &[DaySnapshot], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_snapshot_csv(snapshot, path)?;
    } else {
        write_snapshot_json(snapshot, path)?;
    }
    info!(path = %path.display(), days = snapshot.len(), "schedule snapshot written");
    Ok(())
}
