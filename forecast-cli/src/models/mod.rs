pub mod prediction;
pub mod student;
pub mod user;

pub use prediction::{PredictionResult, RiskLevel};
pub use student::{Gender, PartTimeJob, StudentRecord, ValidationError};
pub use user::{Credential, CurrentUser};
