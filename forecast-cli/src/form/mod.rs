//! Student form state and the handoff of its result to the results view.

use anyhow::Context;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::models::{PredictionResult, StudentRecord, ValidationError};
use crate::storage::{Store, PREDICTION_RESULT_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    Submitting,
    ResultReady,
}

/// Where the caller should go after a successful submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Results,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] ApiError),

    #[error("A prediction request is already in progress")]
    InProgress,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Transient slot holding the last prediction until it is dismissed
#[derive(Clone)]
pub struct ResultHandoff {
    store: Store,
}

impl ResultHandoff {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self, prediction: &PredictionResult) -> anyhow::Result<()> {
        let raw = serde_json::to_string(prediction).context("Failed to serialize prediction")?;
        self.store.put(PREDICTION_RESULT_KEY, &raw)
    }

    /// Stored prediction. Unreadable data counts as nothing stored.
    pub fn load(&self) -> anyhow::Result<Option<PredictionResult>> {
        self.store.get_json(PREDICTION_RESULT_KEY)
    }

    /// Stored prediction, or the preview placeholder when `demo_fallback` is set
    pub fn load_or_placeholder(&self, demo_fallback: bool) -> anyhow::Result<Option<PredictionResult>> {
        match self.load()? {
            Some(prediction) => Ok(Some(prediction)),
            None if demo_fallback => Ok(Some(PredictionResult::placeholder())),
            None => Ok(None),
        }
    }

    pub fn dismiss(&self) -> anyhow::Result<()> {
        self.store.delete(PREDICTION_RESULT_KEY)
    }
}

/// Form contents plus submission state
pub struct StudentForm {
    record: StudentRecord,
    status: FormStatus,
    last_error: Option<String>,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self::new(StudentRecord::default())
    }
}

impl StudentForm {
    pub fn new(record: StudentRecord) -> Self {
        Self {
            record,
            status: FormStatus::Editing,
            last_error: None,
        }
    }

    pub fn record(&self) -> &StudentRecord {
        &self.record
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Message of the most recent failed submit
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Update one field from raw text input.
    ///
    /// Accepts the wire name (`midsem1Marks`) or snake case (`midsem1_marks`).
    pub fn set_field(&mut self, field: &str, raw: &str) -> Result<(), ValidationError> {
        let key: String = field
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        let record = &mut self.record;
        match key.as_str() {
            "studentname" => record.student_name = raw.to_string(),
            "enrollmentnumber" => record.enrollment_number = raw.to_string(),
            "midsem1marks" => record.midsem1_marks = parse_number("midsem1Marks", raw)?,
            "midsem2marks" => record.midsem2_marks = parse_number("midsem2Marks", raw)?,
            "comprehensiveexammarks" => {
                record.comprehensive_exam_marks = parse_number("comprehensiveExamMarks", raw)?
            }
            "attendancepercentage" => {
                record.attendance_percentage = parse_number("attendancePercentage", raw)?
            }
            "studyhoursperweek" => {
                record.study_hours_per_week = parse_number("studyHoursPerWeek", raw)?
            }
            "totalbacklogs" => record.total_backlogs = parse_number("totalBacklogs", raw)?,
            "hasparttimejob" => record.has_part_time_job = raw.parse()?,
            "currentgpa" => record.current_gpa = parse_number("currentGPA", raw)?,
            "gender" => record.gender = raw.parse()?,
            "age" => record.age = parse_number("age", raw)?,
            _ => return Err(ValidationError::UnknownField(field.to_string())),
        }

        if self.status == FormStatus::ResultReady {
            self.status = FormStatus::Editing;
        }
        Ok(())
    }

    /// Validate, request a prediction and hand the result to the results view.
    ///
    /// On failure the form returns to `Editing` with its contents intact and
    /// the message kept in [`StudentForm::last_error`].
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        handoff: &ResultHandoff,
    ) -> Result<Navigation, SubmitError> {
        if self.status == FormStatus::Submitting {
            return Err(SubmitError::InProgress);
        }

        if let Err(e) = self.record.validate() {
            self.fail(e.to_string());
            return Err(e.into());
        }

        self.status = FormStatus::Submitting;
        self.last_error = None;

        match self.request(client, handoff).await {
            Ok(()) => {
                self.status = FormStatus::ResultReady;
                Ok(Navigation::Results)
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    async fn request(&self, client: &ApiClient, handoff: &ResultHandoff) -> Result<(), SubmitError> {
        handoff.dismiss()?;
        let prediction = client.predict(&self.record).await?;
        handoff.store(&prediction)?;
        Ok(())
    }

    fn fail(&mut self, message: String) {
        tracing::debug!("Submit failed: {}", message);
        self.status = FormStatus::Editing;
        self.last_error = Some(message);
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}
