use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSuccess {
    pub original: String,
    pub translated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    /// Outputs already existed and the file was left alone.
    #[serde(default)]
    pub skipped: bool,
    /// A missing field was filled from an alternate one.
    #[serde(default)]
    pub repaired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub original: String,
    pub error: String,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: DateTime<Local>,
    pub total_files: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub successes: Vec<FileSuccess>,
    pub errors: Vec<FileFailure>,
}

impl RunReport {
    pub fn new(total_files: usize) -> Self {
        Self {
            timestamp: Local::now(),
            total_files,
            success_count: 0,
            error_count: 0,
            successes: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self, success: FileSuccess) {
        self.successes.push(success);
        self.success_count = self.successes.len();
    }

    pub fn record_failure(&mut self, original: impl Into<String>, error: impl ToString) {
        self.errors.push(FileFailure {
            original: original.into(),
            error: error.to_string(),
        });
        self.error_count = self.errors.len();
    }

    /// `report_<YYYYmmdd_HHMMSS_mmm>.json`; the milliseconds keep runs in
    /// the same second apart.
    pub fn file_name(&self) -> String {
        format!("report_{}.json", self.timestamp.format("%Y%m%d_%H%M%S_%3f"))
    }

    pub fn has_failures(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_counts_follow_records() {
        let mut report = RunReport::new(3);
        report.record_success(FileSuccess {
            original: "a.json".to_string(),
            translated: "translated_a.json".to_string(),
            formatted: None,
            skipped: false,
            repaired: false,
        });
        report.record_failure("b.json", "Missing field: content");

        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 1);
        assert!(report.has_failures());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_files"], 3);
        assert!(value["successes"][0].get("formatted").is_none());
        assert_eq!(value["errors"][0]["error"], "Missing field: content");
    }

    #[test]
    fn test_file_name() {
        let report = RunReport::new(0);
        let name = report.file_name();
        assert!(name.starts_with("report_"));
        assert!(name.ends_with(".json"));
        // report_ + 8 digits + _ + 6 digits + _ + 3 digits + .json
        assert_eq!(name.len(), "report_".len() + 19 + ".json".len());
    }

    #[test]
    fn test_file_names_differ_within_a_second() {
        let mut first = RunReport::new(0);
        let mut second = RunReport::new(0);
        first.timestamp = Local.with_ymd_and_hms(2024, 5, 18, 12, 34, 56).unwrap();
        second.timestamp = first.timestamp + chrono::Duration::milliseconds(250);
        assert_eq!(first.file_name(), "report_20240518_123456_000.json");
        assert_eq!(second.file_name(), "report_20240518_123456_250.json");
    }
}
