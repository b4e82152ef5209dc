use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::export::DaySnapshot;
use crate::schedule::{AssignmentEngine, ProgramKey, TIME_SLOTS};

/// Formats a program as shown on the grid, e.g. "BSCS 1"
pub fn format_program_name(key: &ProgramKey) -> String {
    format!("{} {}", key.program, key.year)
}

/// Formats a subject cell as "[code] title", falling back to the id
fn format_subject(subject_id: &str, subject_title: &str, code_no: &str) -> String {
    let name = if subject_title.is_empty() { subject_id } else { subject_title };
    if code_no.is_empty() {
        name.to_string()
    } else {
        format!("[{}] {}", code_no, name)
    }
}

/// Prints loaded programs with their subject and remaining counts
pub fn print_catalog_summary(engine: &AssignmentEngine, excluded_dept: &str) {
    let catalog = engine.catalog();
    println!("\n=== Catalog ===");
    println!("Subjects: {}", catalog.subjects.len());
    println!("Programs: {}", catalog.programs.len());

    let shared = catalog.subjects.iter().filter(|s| s.codes.len() > 1).count();
    if shared > 0 {
        println!("Subjects offered under more than one code: {}", shared);
    }

    println!("\nPrograms:");
    for (index, program) in catalog.programs.iter().enumerate() {
        let hidden = !excluded_dept.is_empty() && program.in_dept(excluded_dept);
        println!(
            "  {} [{}] -> {} subjects, {} remaining{}",
            format_program_name(&program.key),
            if program.dept.is_empty() { "-" } else { program.dept.as_str() },
            program.subjects.len(),
            engine.remaining_at(index),
            if hidden { " (hidden)" } else { "" }
        );
    }
}

/// Prints the grid of every active day: one block per program, one line per slot
pub fn print_day_grid(engine: &AssignmentEngine, snapshot: &[DaySnapshot]) {
    for day in snapshot {
        println!("\n=== {} ===", day.date);
        for program in &day.programs {
            let key = ProgramKey::new(program.program.clone(), program.year);
            let remaining = engine.remaining_count(&key).unwrap_or(0);
            println!("  {} (remaining: {})", format_program_name(&key), remaining);
            for label in TIME_SLOTS {
                match program.subjects.iter().find(|s| s.slot_label == label) {
                    Some(s) => println!(
                        "    {} -> {}",
                        label,
                        format_subject(&s.subject_id, &s.subject_title, &s.code_no)
                    ),
                    None => println!("    {} -> [EMPTY]", label),
                }
            }
        }
    }
}

/// Writes the snapshot as plain text, one line per slot: "slot [code] title"
pub fn write_grid_to_file(snapshot: &[DaySnapshot], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;

    for day in snapshot {
        writeln!(file, "** {} **", day.date)?;
        for program in &day.programs {
            writeln!(file, "{}", format_program_name(&ProgramKey::new(program.program.clone(), program.year)))?;
            for label in TIME_SLOTS {
                match program.subjects.iter().find(|s| s.slot_label == label) {
                    Some(s) => writeln!(
                        file,
                        "{} {}",
                        label,
                        format_subject(&s.subject_id, &s.subject_title, &s.code_no)
                    )?,
                    None => writeln!(file, "{} [EMPTY]", label)?,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ProgramSnapshot, SlotAssignment};
    use std::fs;

    #[test]
    fn subject_formatting() {
        assert_eq!(format_subject("MATH1", "Algebra", "1021"), "[1021] Algebra");
        assert_eq!(format_subject("MATH1", "", ""), "MATH1");
        assert_eq!(format_program_name(&ProgramKey::new("BSCS", 2)), "BSCS 2");
    }

    #[test]
    fn grid_file_lists_every_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        let snapshot = vec![DaySnapshot {
            date: "2025-06-02".into(),
            programs: vec![ProgramSnapshot {
                program: "BSCS".into(),
                year: 1,
                subjects: vec![SlotAssignment {
                    subject_id: "MATH1".into(),
                    subject_title: "Algebra".into(),
                    code_no: "1021".into(),
                    slot_label: "9:00 AM-10:30 AM".into(),
                }],
            }],
        }];

        write_grid_to_file(&snapshot, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "** 2025-06-02 **");
        assert_eq!(lines[1], "BSCS 1");
        assert_eq!(lines[2], "7:30 AM-9:00 AM [EMPTY]");
        assert_eq!(lines[3], "9:00 AM-10:30 AM [1021] Algebra");
    }
}
