use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::results::show_results;
use super::{interactive, AppContext};
use crate::form::{Navigation, StudentForm};
use crate::models::ValidationError;

#[derive(Args)]
pub struct PredictCommand {
    /// Student full name
    #[arg(long)]
    student_name: Option<String>,

    /// Enrollment number, e.g. 2021CS001
    #[arg(long)]
    enrollment_number: Option<String>,

    /// Midsem 1 marks (0-100)
    #[arg(long)]
    midsem1_marks: Option<String>,

    /// Midsem 2 marks (0-100)
    #[arg(long)]
    midsem2_marks: Option<String>,

    /// Comprehensive exam marks (0-100)
    #[arg(long)]
    comprehensive_exam_marks: Option<String>,

    /// Past semester attendance percentage (0-100)
    #[arg(long)]
    attendance_percentage: Option<String>,

    /// Study hours per week (0-168)
    #[arg(long)]
    study_hours_per_week: Option<String>,

    /// Total backlogs
    #[arg(long)]
    total_backlogs: Option<String>,

    /// Has a part-time job (yes/no)
    #[arg(long)]
    has_part_time_job: Option<String>,

    /// Current GPA (0-10)
    #[arg(long)]
    current_gpa: Option<String>,

    /// Gender (male/female/other)
    #[arg(long)]
    gender: Option<String>,

    /// Age (16-100)
    #[arg(long)]
    age: Option<String>,

    /// Never prompt; missing fields keep their defaults
    #[arg(long)]
    no_input: bool,
}

/// How a field is asked for interactively
enum Prompt {
    Text(&'static str),
    Choice(&'static str, &'static [&'static str]),
}

impl PredictCommand {
    fn fields(self) -> Vec<(&'static str, Prompt, Option<String>)> {
        vec![
            ("studentName", Prompt::Text("Student name"), self.student_name),
            ("enrollmentNumber", Prompt::Text("Enrollment number"), self.enrollment_number),
            ("midsem1Marks", Prompt::Text("Midsem 1 marks (avg)"), self.midsem1_marks),
            ("midsem2Marks", Prompt::Text("Midsem 2 marks (avg)"), self.midsem2_marks),
            (
                "comprehensiveExamMarks",
                Prompt::Text("Comprehensive exam (avg)"),
                self.comprehensive_exam_marks,
            ),
            ("currentGPA", Prompt::Text("Current GPA (out of 10)"), self.current_gpa),
            ("totalBacklogs", Prompt::Text("Total backlogs"), self.total_backlogs),
            (
                "attendancePercentage",
                Prompt::Text("Past semester attendance (%)"),
                self.attendance_percentage,
            ),
            (
                "studyHoursPerWeek",
                Prompt::Text("Study hours per week"),
                self.study_hours_per_week,
            ),
            ("age", Prompt::Text("Age"), self.age),
            (
                "gender",
                Prompt::Choice("Gender", &["male", "female", "other"]),
                self.gender,
            ),
            (
                "hasPartTimeJob",
                Prompt::Choice("Has part-time job?", &["no", "yes"]),
                self.has_part_time_job,
            ),
        ]
    }

    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let session = ctx.session()?;
        if !session.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'student-forecast login' or 'student-forecast signup' first.");
            anyhow::bail!("Not logged in");
        }

        let prompt = !self.no_input && interactive();
        let mut form = StudentForm::default();

        for (field, how, value) in self.fields() {
            match value {
                Some(raw) => form.set_field(field, &raw)?,
                None if prompt => ask(&mut form, field, how)?,
                None => {}
            }
        }

        let client = ctx.api_client()?;
        let handoff = ctx.handoff()?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        spinner.set_message("Generating prediction...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let outcome = form.submit(&client, &handoff).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(Navigation::Results) => {
                println!("✓ Prediction generated");
                println!();
                show_results(ctx, &handoff)
            }
            Err(e) => {
                println!("✗ Prediction failed: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Prompt until the form accepts the value
fn ask(form: &mut StudentForm, field: &'static str, how: Prompt) -> Result<()> {
    loop {
        let raw = match &how {
            Prompt::Text(label) => Input::<String>::new().with_prompt(*label).interact_text()?,
            Prompt::Choice(label, options) => {
                let index = Select::new()
                    .with_prompt(*label)
                    .items(*options)
                    .default(0)
                    .interact()?;
                options[index].to_string()
            }
        };

        match form.set_field(field, &raw) {
            Ok(()) => return Ok(()),
            Err(e @ ValidationError::InvalidValue { .. }) => println!("  {}", e),
            Err(e) => return Err(e.into()),
        }
    }
}
