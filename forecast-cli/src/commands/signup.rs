use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};

use super::{interactive, AppContext};
use crate::session::AuthError;

#[derive(Args)]
pub struct SignupCommand {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "STUDENT_FORECAST_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl SignupCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let interactive = interactive();
        if interactive {
            println!("Student Forecast - Faculty Signup");
            println!();
        }

        let name = match self.name {
            Some(name) => name,
            None => Input::new().with_prompt("Full name").interact_text()?,
        };

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };

        let password = match self.password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        };

        let mut session = ctx.session()?;

        match session.signup(&name, &email, &password) {
            Ok(user) => {
                println!("✓ Account created!");
                println!();
                println!("Welcome, {}!", user.name);
                println!("Email: {}", user.email);
                Ok(())
            }
            Err(AuthError::AlreadyExists(email)) => {
                println!("✗ Signup failed: an account with {} already exists", email);
                println!();
                println!("Use 'student-forecast login' to sign in.");
                Err(AuthError::AlreadyExists(email).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
