use std::path::PathBuf;

/// Runtime settings for the timetable service
///
/// Each value comes from a CLI flag, else its environment variable, else the
/// default below (see [`crate::cli::ServeArgs`]).
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    /// Directory holding `<term>.json` / `<term>.csv` offering reports
    pub data_dir: PathBuf,
    /// Where saved snapshots are written
    pub export_dir: PathBuf,
    /// Programs of this department stay off the editable grid (empty = none)
    pub excluded_dept: String,
}

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_EXPORT_DIR: &str = "exports";
pub const DEFAULT_EXCLUDED_DEPT: &str = "SAS";

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            excluded_dept: DEFAULT_EXCLUDED_DEPT.to_string(),
        }
    }
}
