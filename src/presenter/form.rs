//! The "add record" form and the render pass around it.

use super::view::DashboardView;
use crate::config::DashboardConfig;
use crate::error::{PlacementError, Result};
use crate::models::{Field, Record, Table};
use crate::store::RecordStore;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Shown after a record was persisted. The page itself is not refreshed.
pub const SUCCESS_MESSAGE: &str =
    "Record added successfully! Please refresh the page to see the update.";

/// Shown when any field of the form was left empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";

/// Raw form input, one string per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub year: String,
    pub serial_number: String,
    pub roll_number: String,
    pub student_name: String,
    pub branch: String,
    pub employer_name: String,
}

impl Submission {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::Year => &self.year,
            Field::SerialNumber => &self.serial_number,
            Field::RollNumber => &self.roll_number,
            Field::StudentName => &self.student_name,
            Field::Branch => &self.branch,
            Field::EmployerName => &self.employer_name,
        }
    }

    /// Fields that are empty or whitespace only, in column order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// Turn the input into a record. Values are kept exactly as typed.
    pub fn into_record(self) -> Result<Record> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(PlacementError::MissingFields(missing));
        }

        Ok(Record {
            year: self.year,
            serial_number: self.serial_number,
            roll_number: self.roll_number,
            student_name: self.student_name,
            branch: self.branch,
            employer_name: self.employer_name,
        })
    }
}

/// Inline message produced by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Notice {
    Success { message: String },
    Error { message: String, missing: Vec<Field> },
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success { message } | Notice::Error { message, .. } => message,
        }
    }
}

/// Validate a submission and, if complete, append it to `snapshot` and persist.
///
/// Missing fields become an error notice and the store is never touched.
/// Store failures are returned as errors.
pub fn submit<S: RecordStore + ?Sized>(
    store: &S,
    snapshot: &Table,
    submission: Submission,
) -> Result<Notice> {
    let record = match submission.into_record() {
        Ok(record) => record,
        Err(PlacementError::MissingFields(missing)) => {
            warn!("Rejected submission, missing: {:?}", missing);
            return Ok(Notice::Error {
                message: MISSING_FIELDS_MESSAGE.to_string(),
                missing,
            });
        }
        Err(e) => return Err(e),
    };

    debug!("Appending record for {}", record.student_name);
    let table = store.append(snapshot, record);
    store.persist(&table)?;
    info!("Record added ({} total)", table.len());

    Ok(Notice::Success {
        message: SUCCESS_MESSAGE.to_string(),
    })
}

/// Output of one page render.
#[derive(Debug, Clone)]
pub struct RenderPass {
    /// The dashboard as loaded at the start of the pass.
    pub view: DashboardView,
    /// Result of the submission, if one was made.
    pub notice: Option<Notice>,
}

/// Load the table, build the dashboard, then handle the optional submission.
///
/// The view reflects the table as loaded, before the submission, so a new
/// record only shows up on the next pass.
pub fn render_pass<S: RecordStore + ?Sized>(
    store: &S,
    settings: &DashboardConfig,
    data_label: &str,
    submission: Option<Submission>,
) -> Result<RenderPass> {
    let table = store.load()?;
    let view = DashboardView::build(&table, settings, data_label);

    let notice = match submission {
        Some(submission) => Some(submit(store, &table, submission)?),
        None => None,
    };

    Ok(RenderPass { view, notice })
}
