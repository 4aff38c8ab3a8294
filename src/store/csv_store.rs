//! CSV file backed store.
//!
//! The file has a fixed header row followed by one row per record. It is
//! rewritten in full on every persist; there is no atomic rename and no
//! locking, so concurrent writers race and the last one wins.

use super::RecordStore;
use crate::error::{PlacementError, Result};
use crate::models::{Field, Record, Table};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Store backed by a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store for the given data file. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the data file.
    #[allow(dead_code)] // Accessor
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, source: io::Error) -> PlacementError {
        PlacementError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> PlacementError {
        PlacementError::Write {
            path: self.path.clone(),
            source,
        }
    }

    /// I/O failures surfaced by the CSV reader are read errors, the rest is bad CSV.
    fn csv_error(&self, source: csv::Error) -> PlacementError {
        if source.is_io_error() {
            self.read_error(source.into())
        } else {
            PlacementError::Malformed {
                path: self.path.clone(),
                source,
            }
        }
    }

    /// Parse the file contents: a header row, then one record per row.
    fn parse<R: Read>(&self, input: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

        let headers = reader.headers().map_err(|e| self.csv_error(e))?.clone();
        let found: Vec<String> = headers.iter().map(String::from).collect();

        if found.iter().map(String::as_str).ne(Field::HEADERS.iter().copied()) {
            return Err(PlacementError::SchemaMismatch {
                path: self.path.clone(),
                found,
            });
        }

        reader
            .deserialize::<Record>()
            .collect::<std::result::Result<Table, csv::Error>>()
            .map_err(|e| self.csv_error(e))
    }
}

impl RecordStore for CsvStore {
    fn load(&self) -> Result<Table> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No data file at {}, starting empty", self.path.display());
                return Ok(Table::new());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        let metadata = file.metadata().map_err(|e| self.read_error(e))?;
        if metadata.is_dir() {
            return Err(self.read_error(io::Error::new(
                io::ErrorKind::Other,
                "is a directory",
            )));
        }
        if metadata.len() == 0 {
            debug!("Data file {} is empty", self.path.display());
            return Ok(Table::new());
        }

        let table = self.parse(BufReader::new(file))?;

        info!(
            "Loaded {} records from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }

    fn persist(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        let file = File::create(&self.path).map_err(|e| self.write_error(e))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));

        writer
            .write_record(Field::HEADERS)
            .map_err(|e| self.write_error(e.into()))?;
        for record in table {
            writer
                .serialize(record)
                .map_err(|e| self.write_error(e.into()))?;
        }

        let mut inner = writer
            .into_inner()
            .map_err(|e| self.write_error(e.into_error()))?;
        inner.flush().map_err(|e| self.write_error(e))?;

        info!(
            "Persisted {} records to {}",
            table.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;
    use tempfile::TempDir;

    fn sample_table() -> Table {
        Table::from(vec![
            record("2023", "1", "R1", "Asha", "CSE", "Acme"),
            record("2023", "2", "R2", "Ravi", "ECE", "Globex, Inc."),
            record("2024", "3", "R3", "Zoë \"Z\" Ng", "CSE", "Initech"),
        ])
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        let table = store.load().unwrap();
        assert!(table.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_zero_byte_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "").unwrap();

        let table = CsvStore::new(&path).load().unwrap();
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_load_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "Year,S.No,Roll No,Name of the Student,Branch,Name of the Employer\n",
        )
        .unwrap();

        assert!(CsvStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order_and_quoting() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        let table = sample_table();

        store.persist(&table).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, table);
        assert_eq!(loaded.records()[1].employer_name, "Globex, Inc.");
    }

    #[test]
    fn test_persist_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        let table = sample_table();

        store.persist(&table).unwrap();
        let first = fs::read(store.path()).unwrap();
        store.persist(&table).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_persist_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));
        store
            .persist(&Table::from(vec![record(
                "2023", "1", "R1", "Asha", "CSE", "Globex, Inc.",
            )]))
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "Year,S.No,Roll No,Name of the Student,Branch,Name of the Employer\n\
             2023,1,R1,Asha,CSE,\"Globex, Inc.\"\n"
        );
    }

    #[test]
    fn test_persist_empty_table_writes_header() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("nested").join("data.csv"));

        store.persist(&Table::new()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "Year,S.No,Roll No,Name of the Student,Branch,Name of the Employer\n"
        );
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data.csv"));

        store.persist(&sample_table()).unwrap();
        let smaller = Table::from(vec![record("2025", "9", "R9", "Mei", "ME", "Hooli")]);
        store.persist(&smaller).unwrap();

        assert_eq!(store.load().unwrap(), smaller);
    }

    #[test]
    fn test_load_rejects_wrong_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "name,branch\nAsha,CSE\n").unwrap();

        let err = CsvStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PlacementError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_load_rejects_ragged_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "Year,S.No,Roll No,Name of the Student,Branch,Name of the Employer\n\
             2023,1,R1,Asha\n",
        )
        .unwrap();

        let err = CsvStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PlacementError::Malformed { .. }));
        assert!(!err.is_user_error());
    }

    /// Serves `data`, then fails like a disk that went away mid-read.
    struct FailingReader {
        data: &'static [u8],
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_failure_mid_file_is_read_error() {
        let store = CsvStore::new("data.csv");
        let reader = FailingReader {
            data: b"Year,S.No,Roll No,Name of the Student,Branch,Name of the Employer\n\
                    2023,1,R1,Asha,CSE,Acme\n",
        };

        let err = store.parse(reader).unwrap_err();
        assert!(matches!(err, PlacementError::Read { .. }), "got {:?}", err);
        assert!(err.to_string().contains("device gone"));
    }

    #[test]
    fn test_read_failure_in_header_is_read_error() {
        let store = CsvStore::new("data.csv");
        let err = store.parse(FailingReader { data: b"" }).unwrap_err();
        assert!(matches!(err, PlacementError::Read { .. }), "got {:?}", err);
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = TempDir::new().unwrap();

        let err = CsvStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, PlacementError::Read { .. }), "got {:?}", err);
    }
}
