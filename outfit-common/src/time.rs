//! Timestamp utilities and timestamped file naming

use chrono::{DateTime, Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Timestamp fragment used in generated file names, e.g. `20250728-1430-Monday`
pub fn filename_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y%m%d-%H%M-%A").to_string()
}

/// Log file path: `{dir}/{name}-{timestamp}.log`
pub fn log_file_name(dir: &Path, name: &str, at: &NaiveDateTime) -> PathBuf {
    dir.join(format!("{}-{}.log", name, filename_timestamp(at)))
}

/// Output table path: `{dir}/{prefix}-{timestamp}.csv`
pub fn output_file_name(dir: &Path, prefix: &str, at: &NaiveDateTime) -> PathBuf {
    dir.join(format!("{}-{}.csv", prefix, filename_timestamp(at)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 28)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_filename_timestamp_format() {
        assert_eq!(filename_timestamp(&sample_time()), "20250728-1430-Monday");
    }

    #[test]
    fn test_log_file_name() {
        let path = log_file_name(Path::new("logs"), "process", &sample_time());
        assert_eq!(path, PathBuf::from("logs/process-20250728-1430-Monday.log"));
    }

    #[test]
    fn test_output_file_name() {
        let path = output_file_name(Path::new("data"), "pisa", &sample_time());
        assert_eq!(path, PathBuf::from("data/pisa-20250728-1430-Monday.csv"));
    }
}
