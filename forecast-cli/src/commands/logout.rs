use anyhow::Result;
use clap::Args;

use super::AppContext;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let mut session = ctx.session()?;
        let client = ctx.api_client()?;

        let was_signed_in = session.is_authenticated() || client.is_authenticated()?;

        session.logout()?;
        client.logout()?;
        ctx.end_session()?;

        if was_signed_in {
            println!("✓ Logged out successfully!");
        } else {
            println!("You are not logged in.");
        }

        Ok(())
    }
}
