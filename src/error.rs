//! Error types for loading offerings and editing the timetable.

use std::path::PathBuf;

use crate::schedule::{Cell, ProgramKey};

/// Named category of a [`ScheduleError`], used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Load,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Load => "load",
        }
    }
}

/// Error type for all fallible timetable operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// No term/year was chosen before loading.
    #[error("Please select term")]
    NoTermSelected,

    /// A date string could not be read as a calendar day.
    #[error("invalid date {input:?}")]
    InvalidDate { input: String },

    /// The subject already sits in another cell.
    #[error("This subject is already assigned in another slot. ({subject_id} is at {held_at}, attempted {attempted})")]
    Conflict {
        subject_id: String,
        held_at: Cell,
        attempted: Cell,
    },

    #[error("unknown program {0}")]
    UnknownProgram(ProgramKey),

    #[error("day {0} is not active")]
    UnknownDay(String),

    #[error("unknown time slot {0:?}")]
    UnknownSlot(String),

    /// Assignment target does not list the subject.
    #[error("subject {subject_id} is not offered by {program}")]
    SubjectNotOffered {
        subject_id: String,
        program: ProgramKey,
    },

    /// An edit arrived before any offerings were loaded.
    #[error("no offerings loaded yet")]
    NotLoaded,

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::NoTermSelected | ScheduleError::InvalidDate { .. } => ErrorKind::Validation,
            ScheduleError::Conflict { .. } => ErrorKind::Conflict,
            ScheduleError::UnknownProgram(_)
            | ScheduleError::UnknownDay(_)
            | ScheduleError::UnknownSlot(_)
            | ScheduleError::SubjectNotOffered { .. }
            | ScheduleError::NotLoaded => ErrorKind::NotFound,
            ScheduleError::Load(_) => ErrorKind::Load,
        }
    }
}

/// Failure reading offering records from the data source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no offerings file for term {term} in {dir}")]
    NotFound { term: String, dir: PathBuf },

    #[error("offerings CSV {} has a header row without {columns}", .path.display())]
    MissingColumns { path: PathBuf, columns: String },

    #[error("failed to read offerings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse offerings CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse offerings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
