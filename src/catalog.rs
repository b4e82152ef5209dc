use std::collections::HashMap;

use crate::parser::OfferingRecord;
use crate::schedule::{Program, ProgramKey, ProgramSubject, Subject, SubjectCode};

/// Subjects and programs derived from one load of offering records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
    pub programs: Vec<Program>,
}

impl Catalog {
    pub fn from_records(records: &[OfferingRecord]) -> Self {
        Self {
            subjects: build_subjects(records),
            programs: build_programs(records),
        }
    }

    /// Position of a program in [`Catalog::programs`]
    pub fn program_index(&self, key: &ProgramKey) -> Option<usize> {
        self.programs.iter().position(|p| p.key == *key)
    }

    pub fn subject(&self, subject_id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.subject_id == subject_id)
    }
}

/// Groups offerings by subject id, in first-seen order
pub fn build_subjects(records: &[OfferingRecord]) -> Vec<Subject> {
    let mut subjects: Vec<Subject> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let code = SubjectCode {
            code_no: record.code_no.clone(),
            program: record.course.clone(),
            year: record.year_level,
            dept: record.dept.clone(),
        };

        match positions.get(record.subject_id.as_str()) {
            Some(&i) => subjects[i].codes.push(code),
            None => {
                positions.insert(&record.subject_id, subjects.len());
                subjects.push(Subject {
                    subject_id: record.subject_id.clone(),
                    subject_title: record.subject_title.clone(),
                    codes: vec![code],
                });
            }
        }
    }

    subjects
}

/// Groups offerings by (course, year level) into programs sorted by name, then year
pub fn build_programs(records: &[OfferingRecord]) -> Vec<Program> {
    let mut programs: Vec<Program> = Vec::new();
    let mut positions: HashMap<ProgramKey, usize> = HashMap::new();

    for record in records {
        let key = ProgramKey::new(record.course.clone(), record.year_level);
        let subject = ProgramSubject {
            subject_id: record.subject_id.clone(),
            subject_title: record.subject_title.clone(),
            code_no: record.code_no.clone(),
        };

        match positions.get(&key) {
            Some(&i) => {
                let program = &mut programs[i];
                if !program.offers(&subject.subject_id) {
                    program.subjects.push(subject);
                }
            }
            None => {
                positions.insert(key.clone(), programs.len());
                programs.push(Program {
                    key,
                    dept: record.dept.clone(),
                    subjects: vec![subject],
                });
            }
        }
    }

    programs.sort_by(|a, b| a.key.cmp(&b.key));
    programs
}
