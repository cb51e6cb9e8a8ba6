use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};

use super::AppContext;

#[derive(Args)]
pub struct LoginCommand {
    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "STUDENT_FORECAST_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Also authenticate against the backend and store its access token
    #[arg(long)]
    remote: bool,
}

impl LoginCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };

        let password = match self.password {
            Some(password) => password,
            None => Password::new().with_prompt("Password").interact()?,
        };

        let mut session = ctx.session()?;

        let user = match session.login(&email, &password) {
            Ok(user) => user,
            Err(e) => {
                println!("✗ Login failed: {}", e);
                return Err(e.into());
            }
        };

        if self.remote {
            if let Err(e) = login_remote(ctx, &email, &password).await {
                // Signed in only when both checks pass
                session.logout()?;
                return Err(e);
            }
        }

        println!("✓ Login successful!");
        println!();
        println!("Welcome, {}!", user.name);
        println!("Email: {}", user.email);
        if self.remote {
            println!("Predictions will be sent with your access token.");
        }
        Ok(())
    }
}

async fn login_remote(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let client = ctx.api_client()?;

    println!("Logging in to {}...", client.base_url());

    // Token is saved by the client
    if let Err(e) = client.login(email, password).await {
        println!("✗ Login failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
