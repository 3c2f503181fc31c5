// Record loading for the command-line tool.
//
// JSON files hold an array of records in their full shape, nested task
// details and status maps included. CSV files hold one flat row per record;
// every cell is read as an optional string and cleaned through the lenient
// parsers in `util`, and rows that cannot be cleaned are skipped and counted.
use crate::error::ReportError;
use crate::types::{ConstructionTask, EmployeeLoad, TeamEfficiency};
use crate::util::{days_diff, parse_bool_safe, parse_date_safe, parse_f64_safe, parse_i64_safe};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

/// A record that can also be read from a flat CSV row.
pub trait CsvRecord: DeserializeOwned + Sized {
    type Row: DeserializeOwned;

    /// Clean a raw row; `None` when a required cell is missing or unusable.
    fn from_row(row: Self::Row) -> Option<Self>;
}

/// Load records from `path`, choosing JSON or CSV by file extension.
pub fn load_records<T: CsvRecord>(path: &Path) -> Result<(Vec<T>, LoadReport), ReportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("json") => load_json(path),
        Some("csv") => load_csv(path),
        other => Err(load_error(
            path,
            format!("unsupported input format {:?}, expected .csv or .json", other.unwrap_or("")),
        )),
    }
}

fn load_error(path: &Path, message: impl Into<String>) -> ReportError {
    ReportError::Load {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, LoadReport), ReportError> {
    let text = fs::read_to_string(path).map_err(|e| load_error(path, e.to_string()))?;
    let records: Vec<T> = serde_json::from_str(&text).map_err(|e| load_error(path, e.to_string()))?;
    let report = LoadReport {
        total_rows: records.len(),
        loaded_rows: records.len(),
        parse_errors: 0,
    };
    Ok((records, report))
}

fn load_csv<T: CsvRecord>(path: &Path) -> Result<(Vec<T>, LoadReport), ReportError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| load_error(path, e.to_string()))?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut records = Vec::new();

    for result in rdr.deserialize::<T::Row>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = total_rows, error = %e, "unreadable csv row");
                parse_errors += 1;
                continue;
            }
        };
        match T::from_row(row) {
            Some(record) => records.push(record),
            None => parse_errors += 1,
        }
    }

    if parse_errors > 0 {
        warn!(path = %path.display(), skipped = parse_errors, "skipped malformed csv rows");
    }
    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        parse_errors,
    };
    Ok((records, report))
}

fn required(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstructionRow {
    #[serde(alias = "taskName")]
    pub name: Option<String>,
    pub status: Option<String>,
    pub planned_end: Option<String>,
    pub actual_end: Option<String>,
    #[serde(alias = "isDelayed")]
    pub delayed: Option<String>,
    pub delay_in_days: Option<String>,
    pub completion_percentage: Option<String>,
}

impl CsvRecord for ConstructionTask {
    type Row = ConstructionRow;

    fn from_row(row: ConstructionRow) -> Option<Self> {
        let name = required(row.name)?;
        let status = row.status.unwrap_or_default().trim().to_string();
        let planned = parse_date_safe(row.planned_end.as_deref());
        let actual = parse_date_safe(row.actual_end.as_deref());

        // Without an explicit delay, a late actual end implies one.
        let delay = parse_i64_safe(row.delay_in_days.as_deref()).or(match (planned, actual) {
            (Some(p), Some(a)) => Some(days_diff(p, a).max(0)),
            _ => None,
        });
        let delayed = parse_bool_safe(row.delayed.as_deref()).unwrap_or(delay.unwrap_or(0) > 0);

        let mut builder = ConstructionTask::builder(name, status).delayed(delayed);
        if let Some(d) = planned {
            builder = builder.planned_end(d);
        }
        if let Some(d) = actual {
            builder = builder.actual_end(d);
        }
        if let Some(d) = delay {
            builder = builder.delay_in_days(d);
        }
        if let Some(p) = parse_f64_safe(row.completion_percentage.as_deref()) {
            builder = builder.completion_percentage(p.clamp(0.0, 100.0).round() as u8);
        }
        Some(builder.build())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeRow {
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub task_count: Option<String>,
    pub total_hours: Option<String>,
    #[serde(alias = "fteEquivalent")]
    pub fte: Option<String>,
}

impl CsvRecord for EmployeeLoad {
    type Row = EmployeeRow;

    fn from_row(row: EmployeeRow) -> Option<Self> {
        let id = parse_i64_safe(row.employee_id.as_deref())?;
        let name = required(row.employee_name)?;
        let task_count = parse_i64_safe(row.task_count.as_deref())
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        let mut builder = EmployeeLoad::builder(id, name)
            .task_count(task_count)
            .total_hours(parse_f64_safe(row.total_hours.as_deref()).unwrap_or(0.0));
        if let Some(fte) = parse_f64_safe(row.fte.as_deref()) {
            builder = builder.fte(fte);
        }
        Some(builder.build())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamRow {
    pub team_name: Option<String>,
    pub total_tasks: Option<String>,
    pub completed_tasks: Option<String>,
    pub on_time_tasks: Option<String>,
    pub delayed_tasks: Option<String>,
    pub avg_delay_days: Option<String>,
    pub active_members: Option<String>,
    pub tasks_per_member: Option<String>,
    pub efficiency_score: Option<String>,
    pub has_no_tasks: Option<String>,
}

impl CsvRecord for TeamEfficiency {
    type Row = TeamRow;

    fn from_row(row: TeamRow) -> Option<Self> {
        let count = |cell: &Option<String>| {
            parse_i64_safe(cell.as_deref()).and_then(|n| u64::try_from(n).ok())
        };
        let mut builder = TeamEfficiency::builder(required(row.team_name.clone())?)
            .has_no_tasks(parse_bool_safe(row.has_no_tasks.as_deref()).unwrap_or(false));
        if let Some(n) = count(&row.total_tasks) {
            builder = builder.total_tasks(n);
        }
        if let Some(n) = count(&row.completed_tasks) {
            builder = builder.completed_tasks(n);
        }
        if let Some(n) = count(&row.on_time_tasks) {
            builder = builder.on_time_tasks(n);
        }
        if let Some(n) = count(&row.delayed_tasks) {
            builder = builder.delayed_tasks(n);
        }
        if let Some(d) = parse_f64_safe(row.avg_delay_days.as_deref()) {
            builder = builder.avg_delay_days(d);
        }
        if let Some(n) = count(&row.active_members).and_then(|n| u32::try_from(n).ok()) {
            builder = builder.active_members(n);
        }
        if let Some(n) = parse_f64_safe(row.tasks_per_member.as_deref()) {
            builder = builder.tasks_per_member(n);
        }
        if let Some(s) = parse_f64_safe(row.efficiency_score.as_deref()) {
            builder = builder.efficiency_score(s);
        }
        Some(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_rows_are_cleaned_and_bad_rows_counted() {
        let file = write_temp(
            ".csv",
            "name,status,plannedEnd,actualEnd,completionPercentage\n\
             Foundations,DONE,2024-01-10,2024-01-15,100\n\
             ,DONE,,,\n\
             Roof,IN_PROGRESS,2024-02-01,,40\n",
        );
        let (tasks, report) = load_records::<ConstructionTask>(file.path()).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].delay_in_days(), Some(5));
        assert!(tasks[0].is_delayed());
        assert_eq!(tasks[1].delay_in_days(), None);
        assert!(!tasks[1].is_delayed());
        assert_eq!(tasks[1].completion_percentage(), Some(40));
    }

    #[test]
    fn json_keeps_nested_details() {
        let file = write_temp(
            ".json",
            r#"[{"employeeId": 4, "employeeName": "Ann", "taskCount": 1, "totalHours": 8,
                 "tasks": [{"taskName": "Plan", "status": "DONE", "priority": "High"}],
                 "tasksByStatus": {"DONE": 1}}]"#,
        );
        let (staff, report) = load_records::<EmployeeLoad>(file.path()).unwrap();
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(staff[0].tasks()[0].priority(), Some("High"));
        assert_eq!(staff[0].tasks_by_status().get("DONE"), Some(1));
    }

    #[test]
    fn unknown_extension_is_a_load_error() {
        let file = write_temp(".xlsx", "");
        let err = load_records::<TeamEfficiency>(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::Load { .. }));
    }
}
