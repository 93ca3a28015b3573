//! Tests for the on-disk CSV log

#[cfg(feature = "std")]
mod tests {
    use ledtherm_core::{
        constants::{CSV_HEADER, CSV_HEADER_WITH_REFERENCE},
        logger::CsvLogStore,
        record::LocalTimestamp,
        traits::RecordSink,
        CycleRecord, MonitorError,
    };
    use std::fs;
    use tempfile::TempDir;

    fn record(reference: Option<f32>) -> CycleRecord {
        CycleRecord {
            timestamp: LocalTimestamp::new(2024, 3, 1, 12, 0, 15),
            led_temperature_avg: 24.6,
            led_voltage_avg: 1.7221454,
            reference_temperature_avg: reference,
        }
    }

    #[test]
    fn creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mittaukset.csv");
        let mut store = CsvLogStore::new(&path);

        store.ensure_store(true).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, CSV_HEADER_WITH_REFERENCE);
        assert!(!contents.ends_with('\n'));
    }

    #[test]
    fn ensure_store_twice_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mittaukset.csv");
        let mut store = CsvLogStore::new(&path);

        store.ensure_store(false).unwrap();
        let first = fs::read(&path).unwrap();
        store.ensure_store(false).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn existing_file_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mittaukset.csv");
        let previous = format!("{}\n01.03.2024 11:59:00,24.10,1.723000", CSV_HEADER);
        fs::write(&path, &previous).unwrap();

        let mut store = CsvLogStore::new(&path);
        store.ensure_store(true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), previous);
    }

    #[test]
    fn appends_newline_prefixed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mittaukset.csv");
        let mut store = CsvLogStore::new(&path);

        store.ensure_store(true).unwrap();
        store.append(&record(Some(22.0))).unwrap();
        store.append(&record(Some(21.0))).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER_WITH_REFERENCE);
        assert_eq!(lines[1], "01.03.2024 12:00:15,24.60,1.722145,22.00");
        assert_eq!(lines[2], "01.03.2024 12:00:15,24.60,1.722145,21.00");
    }

    #[test]
    fn append_to_missing_file_creates_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.csv");
        let mut store = CsvLogStore::new(&path);

        store.append(&record(None)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\n01.03.2024 12:00:15,24.60,1.722145"
        );
    }

    #[test]
    fn unwritable_location_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("mittaukset.csv");
        let mut store = CsvLogStore::new(&path);

        let result = store.ensure_store(false);
        assert!(matches!(result, Err(MonitorError::Io(_))));
    }

    #[test]
    fn default_path_is_working_directory_log() {
        let store = CsvLogStore::default();
        assert_eq!(store.path().to_str(), Some("mittaukset.csv"));
    }
}
