use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Student metrics submitted for a GPA prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub student_name: String,
    pub enrollment_number: String,
    pub midsem1_marks: f64,
    pub midsem2_marks: f64,
    pub comprehensive_exam_marks: f64,
    pub attendance_percentage: f64,
    pub study_hours_per_week: f64,
    pub total_backlogs: u32,
    pub has_part_time_job: PartTimeJob,
    #[serde(rename = "currentGPA")]
    pub current_gpa: f64,
    pub gender: Gender,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

/// Sent as "yes"/"no" on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartTimeJob {
    Yes,
    #[default]
    No,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl Default for StudentRecord {
    /// Blank form contents
    fn default() -> Self {
        Self {
            student_name: String::new(),
            enrollment_number: String::new(),
            midsem1_marks: 0.0,
            midsem2_marks: 0.0,
            comprehensive_exam_marks: 0.0,
            attendance_percentage: 0.0,
            study_hours_per_week: 0.0,
            total_backlogs: 0,
            has_part_time_job: PartTimeJob::No,
            current_gpa: 0.0,
            gender: Gender::Male,
            age: 18,
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

impl StudentRecord {
    /// Check required fields and numeric ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_name.trim().is_empty() {
            return Err(ValidationError::Required("studentName"));
        }
        if self.enrollment_number.trim().is_empty() {
            return Err(ValidationError::Required("enrollmentNumber"));
        }

        check_range("midsem1Marks", self.midsem1_marks, 0.0, 100.0)?;
        check_range("midsem2Marks", self.midsem2_marks, 0.0, 100.0)?;
        check_range("comprehensiveExamMarks", self.comprehensive_exam_marks, 0.0, 100.0)?;
        check_range("attendancePercentage", self.attendance_percentage, 0.0, 100.0)?;
        check_range("studyHoursPerWeek", self.study_hours_per_week, 0.0, 168.0)?;
        check_range("currentGPA", self.current_gpa, 0.0, 10.0)?;
        check_range("age", self.age as f64, 16.0, 100.0)?;

        Ok(())
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ValidationError::InvalidValue {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PartTimeJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartTimeJob::Yes => write!(f, "yes"),
            PartTimeJob::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for PartTimeJob {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(PartTimeJob::Yes),
            "no" | "n" | "false" => Ok(PartTimeJob::No),
            _ => Err(ValidationError::InvalidValue {
                field: "hasPartTimeJob",
                value: s.to_string(),
            }),
        }
    }
}
