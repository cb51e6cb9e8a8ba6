use anyhow::Result;
use clap::Args;
use std::io::IsTerminal;

use super::AppContext;
use crate::form::ResultHandoff;
use crate::ui::ResultsView;

#[derive(Args)]
pub struct ResultsCommand {
    /// Clear the stored prediction to start a new one
    #[arg(long)]
    dismiss: bool,

    /// Print the prediction as JSON
    #[arg(long)]
    json: bool,
}

impl ResultsCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let handoff = ctx.handoff()?;

        if self.dismiss {
            handoff.dismiss()?;
            println!("✓ Prediction cleared. Run 'student-forecast predict' for another student.");
            return Ok(());
        }

        if self.json {
            let prediction = handoff.load_or_placeholder(ctx.config.results.demo_fallback)?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
            return Ok(());
        }

        show_results(ctx, &handoff)
    }
}

/// Render the stored prediction, or the placeholder when enabled
pub(super) fn show_results(ctx: &AppContext, handoff: &ResultHandoff) -> Result<()> {
    let Some(prediction) = handoff.load_or_placeholder(ctx.config.results.demo_fallback)? else {
        println!("No prediction available.");
        println!();
        println!("Use 'student-forecast predict' to generate one.");
        return Ok(());
    };

    let view = ResultsView::new(&prediction);
    let text = if std::io::stdout().is_terminal() {
        view.render()
    } else {
        view.plain().render()
    };

    print!("{}", text);
    Ok(())
}
