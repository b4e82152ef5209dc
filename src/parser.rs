use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::error::LoadError;

/// One row of the code summary report: a subject offered under a program/year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject_title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code_no: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year_level: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dept: String,
}

impl OfferingRecord {
    /// Records without a subject id, a course or a readable year level cannot be placed anywhere
    pub fn is_complete(&self) -> bool {
        !self.subject_id.is_empty() && !self.course.is_empty() && self.year_level > 0
    }
}

/// Report fields arrive as strings, bare numbers or null depending on the export
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientField {
    Text(String),
    Int(i64),
    Float(f64),
    Null,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientField::deserialize(deserializer)? {
        LenientField::Text(s) => s.trim().to_string(),
        LenientField::Int(n) => n.to_string(),
        LenientField::Float(n) => n.to_string(),
        LenientField::Null => String::new(),
    })
}

fn lenient_year<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientField::deserialize(deserializer)? {
        LenientField::Text(s) => Ok(parse_year(&s)),
        LenientField::Int(n) => Ok(u32::try_from(n).unwrap_or(0)),
        LenientField::Float(n) if n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        LenientField::Float(_) | LenientField::Null => Ok(0),
    }
}

/// Parses a year level such as "2" or "2nd"
///
/// Returns 0 (an incomplete row) when no year can be read.
fn parse_year(value: &str) -> u32 {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(&lower);
    digits.trim().parse().unwrap_or(0)
}

/// The report either comes bare or wrapped as `{"data": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum OfferingPayload {
    Wrapped { data: Vec<OfferingRecord> },
    Bare(Vec<OfferingRecord>),
}

/// Loads offering records for a term from `data_dir`
///
/// Looks for `<term>.json` first, then `<term>.csv`. Incomplete rows are dropped.
pub fn load_offerings<P: AsRef<Path>>(data_dir: P, term: &str) -> Result<Vec<OfferingRecord>, LoadError> {
    let dir = data_dir.as_ref();
    let json_path = dir.join(format!("{}.json", term));
    let csv_path = dir.join(format!("{}.csv", term));

    let records = if json_path.exists() {
        load_offerings_json(&json_path)?
    } else if csv_path.exists() {
        load_offerings_csv(&csv_path)?
    } else {
        return Err(LoadError::NotFound {
            term: term.to_string(),
            dir: dir.to_path_buf(),
        });
    };

    info!(term, records = records.len(), "loaded offerings");
    Ok(records)
}

/// Loads offering records from a JSON report
pub fn load_offerings_json<P: AsRef<Path>>(path: P) -> Result<Vec<OfferingRecord>, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let records = match serde_json::from_reader(reader)? {
        OfferingPayload::Wrapped { data } => data,
        OfferingPayload::Bare(data) => data,
    };
    Ok(keep_complete(records))
}

/// Column names of the code summary report, in positional order
const OFFERING_COLUMNS: [&str; 6] = ["subjectId", "subjectTitle", "codeNo", "course", "yearLevel", "dept"];

/// Header cells compare case-insensitively, ignoring `_`, `-` and spaces
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Loads offering records from a CSV report
///
/// Columns are found by header name (`subject_id` and `Subject Id` match
/// `subjectId`). A file whose first row names none of the report columns is
/// read positionally as subjectId, subjectTitle, codeNo, course, yearLevel, dept.
pub fn load_offerings_csv<P: AsRef<Path>>(path: P) -> Result<Vec<OfferingRecord>, LoadError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let named = |name: &str| {
        let name = normalize_header(name);
        headers.iter().position(|h| *h == name)
    };
    let is_header_row = OFFERING_COLUMNS.iter().any(|c| named(c).is_some());

    let columns: [Option<usize>; 6] = if is_header_row {
        let columns = OFFERING_COLUMNS.map(|c| named(c));
        let missing: Vec<&str> = ["subjectId", "course"]
            .into_iter()
            .filter(|c| named(c).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing.join(", "),
            });
        }
        columns
    } else {
        // Without recognizable headers the first line is data
        debug!(path = %path.display(), "no offering headers found, reading columns by position");
        reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)]
    };
    let [subject_id_col, subject_title_col, code_no_col, course_col, year_col, dept_col] = columns;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let field = |col: Option<usize>| {
            col.and_then(|c| row.get(c))
                .unwrap_or("")
                .trim()
                .to_string()
        };

        records.push(OfferingRecord {
            subject_id: field(subject_id_col),
            subject_title: field(subject_title_col),
            code_no: field(code_no_col),
            course: field(course_col),
            year_level: parse_year(&field(year_col)),
            dept: field(dept_col),
        });
    }

    Ok(keep_complete(records))
}

fn keep_complete(records: Vec<OfferingRecord>) -> Vec<OfferingRecord> {
    let total = records.len();
    let complete: Vec<OfferingRecord> = records.into_iter().filter(|r| r.is_complete()).collect();
    if complete.len() < total {
        warn!(
            skipped = total - complete.len(),
            "skipping offerings without subjectId, course or a readable year level"
        );
    }
    debug!(kept = complete.len(), "offering rows accepted");
    complete
}
