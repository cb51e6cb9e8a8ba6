use serde::{Deserialize, Serialize};

/// Prediction returned by the forecasting backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub student_name: String,
    pub enrollment_number: String,
    #[serde(rename = "predictedGPA")]
    pub predicted_gpa: f64,
    pub academic_risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl RiskLevel {
    /// One-line interpretation shown under the risk badge
    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => {
                "Student is performing well and likely to maintain good academic standing."
            }
            RiskLevel::Medium => {
                "Student may need additional support to maintain academic performance."
            }
            RiskLevel::High => "Student requires immediate intervention and academic counseling.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

impl PredictionResult {
    /// Preview result shown when no prediction has been stored
    pub fn placeholder() -> Self {
        Self {
            student_name: "John Doe".to_string(),
            enrollment_number: "2021CS001".to_string(),
            predicted_gpa: 8.2,
            academic_risk_level: RiskLevel::Medium,
            recommendations: Some(vec![
                "Increase study hours by 5 hours per week".to_string(),
                "Focus on improving attendance to above 85%".to_string(),
                "Seek help from tutors for subjects with lower marks".to_string(),
                "Consider reducing part-time work hours if possible".to_string(),
            ]),
        }
    }

    /// Recommendations, skipping an empty or missing list
    pub fn recommendations(&self) -> Option<&[String]> {
        self.recommendations
            .as_deref()
            .filter(|recommendations| !recommendations.is_empty())
    }
}
