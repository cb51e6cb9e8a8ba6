use anyhow::Result;
use clap::Args;

use super::AppContext;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let session = ctx.session()?;

        let Some(user) = session.current_user() else {
            println!("You are not logged in.");
            println!();
            println!("Use 'student-forecast login' or 'student-forecast signup' to authenticate.");
            return Ok(());
        };

        let has_token = ctx.api_client()?.is_authenticated()?;

        println!("✓ Authenticated as:");
        println!();
        println!("  Name:     {}", user.name);
        println!("  Email:    {}", user.email);
        println!("  User ID:  {}", user.id);
        println!(
            "  API token: {}",
            if has_token { "stored" } else { "none" }
        );

        Ok(())
    }
}
