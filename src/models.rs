//! Data models for the placement dashboard.
//!
//! This module contains the fixed six-column schema, the placement
//! record itself, and the ordered table of records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One column of the placement schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    Year,
    SerialNumber,
    RollNumber,
    StudentName,
    Branch,
    EmployerName,
}

impl Field {
    /// All fields in file column order.
    pub const ALL: [Field; 6] = [
        Field::Year,
        Field::SerialNumber,
        Field::RollNumber,
        Field::StudentName,
        Field::Branch,
        Field::EmployerName,
    ];

    /// The header row of the data file, in column order.
    pub const HEADERS: [&'static str; 6] = [
        "Year",
        "S.No",
        "Roll No",
        "Name of the Student",
        "Branch",
        "Name of the Employer",
    ];

    /// Returns the column header used in the data file.
    pub fn header(&self) -> &'static str {
        Self::HEADERS[self.index()]
    }

    /// Returns the short label used in chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::SerialNumber => "S.No",
            Field::RollNumber => "Roll No",
            Field::StudentName => "Student Name",
            Field::Branch => "Branch",
            Field::EmployerName => "Employer",
        }
    }

    /// Position of the column in the data file.
    pub fn index(&self) -> usize {
        match self {
            Field::Year => 0,
            Field::SerialNumber => 1,
            Field::RollNumber => 2,
            Field::StudentName => 3,
            Field::Branch => 4,
            Field::EmployerName => 5,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Accepts the file header, the short label, or the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let aliases: &[(&str, Field)] = &[
            ("serialnumber", Field::SerialNumber),
            ("serial_number", Field::SerialNumber),
            ("rollnumber", Field::RollNumber),
            ("roll_number", Field::RollNumber),
            ("studentname", Field::StudentName),
            ("student_name", Field::StudentName),
            ("student", Field::StudentName),
            ("employername", Field::EmployerName),
            ("employer_name", Field::EmployerName),
        ];

        Field::ALL
            .iter()
            .copied()
            .find(|f| {
                f.header().to_lowercase() == wanted || f.label().to_lowercase() == wanted
            })
            .or_else(|| {
                aliases
                    .iter()
                    .find(|(alias, _)| *alias == wanted)
                    .map(|(_, f)| *f)
            })
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

impl TryFrom<String> for Field {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.header().to_string()
    }
}

/// One placement event.
///
/// Serde names match the data file headers, and the declaration order
/// matches the column order, so the CSV reader and writer can use the
/// struct directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "S.No")]
    pub serial_number: String,
    #[serde(rename = "Roll No")]
    pub roll_number: String,
    #[serde(rename = "Name of the Student")]
    pub student_name: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "Name of the Employer")]
    pub employer_name: String,
}

impl Record {
    /// Returns the value stored in the given column.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Year => &self.year,
            Field::SerialNumber => &self.serial_number,
            Field::RollNumber => &self.roll_number,
            Field::StudentName => &self.student_name,
            Field::Branch => &self.branch,
            Field::EmployerName => &self.employer_name,
        }
    }

    /// Returns all six values in column order.
    pub fn values(&self) -> [&str; 6] {
        Field::ALL.map(|f| self.get(f))
    }
}

/// Ordered collection of records, one per data row of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    #[allow(dead_code)] // Accessor for tests and library callers
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns a new table with `record` at the end, leaving `self` untouched.
    pub fn appended(&self, record: Record) -> Self {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend(self.records.iter().cloned());
        records.push(record);
        Self { records }
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) fn record(
    year: &str,
    serial: &str,
    roll: &str,
    student: &str,
    branch: &str,
    employer: &str,
) -> Record {
    Record {
        year: year.to_string(),
        serial_number: serial.to_string(),
        roll_number: roll.to_string(),
        student_name: student.to_string(),
        branch: branch.to_string(),
        employer_name: employer.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_headers_in_column_order() {
        let headers: Vec<&str> = Field::ALL.iter().map(|f| f.header()).collect();
        assert_eq!(headers, Field::HEADERS.to_vec());
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("Branch".parse::<Field>(), Ok(Field::Branch));
        assert_eq!("name of the employer".parse::<Field>(), Ok(Field::EmployerName));
        assert_eq!("Employer".parse::<Field>(), Ok(Field::EmployerName));
        assert_eq!("student_name".parse::<Field>(), Ok(Field::StudentName));
        assert_eq!("S.No".parse::<Field>(), Ok(Field::SerialNumber));
        assert!("salary".parse::<Field>().is_err());
    }

    #[test]
    fn test_record_values() {
        let r = record("2023", "1", "R1", "Asha", "CSE", "Acme");
        assert_eq!(r.get(Field::StudentName), "Asha");
        assert_eq!(r.values(), ["2023", "1", "R1", "Asha", "CSE", "Acme"]);
    }

    #[test]
    fn test_appended_leaves_original() {
        let table = Table::new();
        let grown = table.appended(record("2023", "1", "R1", "Asha", "CSE", "Acme"));

        assert!(table.is_empty());
        assert_eq!(grown.len(), 1);
        assert_eq!(grown.records()[0].student_name, "Asha");
    }

    #[test]
    fn test_record_json_uses_headers() {
        let r = record("2023", "1", "R1", "Asha", "CSE", "Acme");
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"Name of the Employer\":\"Acme\""));
        assert!(json.contains("\"S.No\":\"1\""));
    }
}
