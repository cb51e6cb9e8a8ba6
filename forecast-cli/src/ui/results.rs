use colored::{ColoredString, Colorize};
use std::fmt;

use crate::models::{PredictionResult, RiskLevel};

const RULE: &str = "────────────────────────────────";

/// Text rendering of a prediction
pub struct ResultsView<'a> {
    prediction: &'a PredictionResult,
    color: bool,
}

impl<'a> ResultsView<'a> {
    pub fn new(prediction: &'a PredictionResult) -> Self {
        Self {
            prediction,
            color: true,
        }
    }

    /// Disable ANSI styling, e.g. when output is piped
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    /// Badge text such as "LOW Risk"
    pub fn risk_badge(level: RiskLevel) -> String {
        format!("{} Risk", level.to_string().to_uppercase())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn style(&self, text: &str, paint: impl Fn(ColoredString) -> ColoredString) -> String {
        if self.color {
            paint(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for ResultsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.prediction;

        writeln!(f, "{}", self.style(" Prediction Results", |s| s.bold()))?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        writeln!(f, "  {}", self.style(&p.student_name, |s| s.bold()))?;
        writeln!(f, "  Enrollment: {}", p.enrollment_number)?;
        writeln!(f)?;

        writeln!(f, "{}", self.style(" Predicted GPA", |s| s.bold()))?;
        let gpa = format!("{:.2}", p.predicted_gpa);
        writeln!(f, "  {}", self.style(&gpa, |s| s.cyan().bold()))?;
        writeln!(f, "  out of 10.0")?;
        writeln!(f)?;

        let level = p.academic_risk_level;
        writeln!(f, "{}", self.style(" Academic Risk Level", |s| s.bold()))?;
        let badge = format!("[{}]", Self::risk_badge(level));
        writeln!(
            f,
            "  {}",
            self.style(&badge, |s| match level {
                RiskLevel::Low => s.green().bold(),
                RiskLevel::Medium => s.yellow().bold(),
                RiskLevel::High => s.red().bold(),
            })
        )?;
        writeln!(f, "  {}", level.description())?;

        if let Some(recommendations) = p.recommendations() {
            writeln!(f)?;
            writeln!(f, "{}", self.style(" Recommendations", |s| s.bold()))?;
            for recommendation in recommendations {
                writeln!(f, "  • {}", recommendation)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_badge() {
        assert_eq!(ResultsView::risk_badge(RiskLevel::Low), "LOW Risk");
        assert_eq!(ResultsView::risk_badge(RiskLevel::Medium), "MEDIUM Risk");
        assert_eq!(ResultsView::risk_badge(RiskLevel::High), "HIGH Risk");
    }

    #[test]
    fn test_render_without_recommendations() {
        let prediction = PredictionResult {
            student_name: "Jane Roe".to_string(),
            enrollment_number: "2022CS099".to_string(),
            predicted_gpa: 8.7,
            academic_risk_level: RiskLevel::Low,
            recommendations: None,
        };

        let text = ResultsView::new(&prediction).plain().render();
        assert!(text.contains("Jane Roe"));
        assert!(text.contains("Enrollment: 2022CS099"));
        assert!(text.contains("8.70"));
        assert!(text.contains("[LOW Risk]"));
        assert!(text.contains(RiskLevel::Low.description()));
        assert!(!text.contains("Recommendations"));
    }

    #[test]
    fn test_render_placeholder() {
        let placeholder = PredictionResult::placeholder();
        let text = ResultsView::new(&placeholder).plain().render();

        assert!(text.contains("John Doe"));
        assert!(text.contains("8.20"));
        assert!(text.contains("[MEDIUM Risk]"));
        assert!(text.contains("Recommendations"));
        assert_eq!(text.matches("  • ").count(), 4);
    }

    #[test]
    fn test_display_matches_render() {
        let placeholder = PredictionResult::placeholder();
        let view = ResultsView::new(&placeholder).plain();
        assert_eq!(format!("{}", view), view.render());
    }
}
