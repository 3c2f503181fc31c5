// File naming and directory layout for stored reports.
//
// Reports land in `<base>/<kind>/<kind>-<yyyyMMdd-HHmmss>-<8 hex>.<ext>`.
use crate::error::ReportError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A collision-resistant file name: kind, local timestamp, and the first
/// eight hex digits of a random v4 UUID.
pub fn unique_file_name(kind: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}.{}", kind, timestamp, &suffix[..8], extension)
}

pub fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ReportError::storage(dir, e))?;
    }
    Ok(())
}

/// Resolve `<base>/<kind>/<file_name>`, creating the kind directory.
pub fn resolve_report_path(base: &Path, kind: &str, file_name: &str) -> Result<PathBuf, ReportError> {
    let dir = base.join(kind);
    ensure_dir(&dir)?;
    Ok(dir.join(file_name))
}
