pub mod types;
pub mod slot_utils;
pub mod days;
mod store;
pub mod engine;

pub use types::{Cell, Program, ProgramKey, ProgramSubject, Subject, SubjectCode};
pub use slot_utils::{format_day, parse_day, TimeSlot, TIME_SLOTS};
pub use engine::AssignmentEngine;
