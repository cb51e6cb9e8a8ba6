mod config_cmd;
mod context;
mod login;
mod logout;
mod predict;
mod results;
mod signup;
mod whoami;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::Config;

pub use context::AppContext;
pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use predict::PredictCommand;
pub use results::ResultsCommand;
pub use signup::SignupCommand;
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "student-forecast")]
#[command(about = "Student GPA forecasting from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "STUDENT_FORECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Override the prediction API base URL
    #[arg(long, global = true, env = "STUDENT_FORECAST_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a faculty account and sign in
    Signup(SignupCommand),

    /// Sign in with an existing account
    Login(LoginCommand),

    /// Sign out and clear the session
    Logout(LogoutCommand),

    /// Show the signed-in user
    Whoami(WhoamiCommand),

    /// Submit student data for a GPA prediction
    Predict(PredictCommand),

    /// Show the last prediction
    Results(ResultsCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file()?,
        };

        let api_url = self.api_url;
        let context = || AppContext::load(&config_path, api_url.clone());

        match self.command {
            Commands::Signup(cmd) => cmd.execute(&context()?).await,
            Commands::Login(cmd) => cmd.execute(&context()?).await,
            Commands::Logout(cmd) => cmd.execute(&context()?).await,
            Commands::Whoami(cmd) => cmd.execute(&context()?).await,
            Commands::Predict(cmd) => cmd.execute(&context()?).await,
            Commands::Results(cmd) => cmd.execute(&context()?).await,
            // Configuration never touches the local database
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&config_path).await,
                ConfigSubcommands::Edit => config_cmd::edit_config(&config_path).await,
                ConfigSubcommands::Init { force } => {
                    config_cmd::init_config(&config_path, force).await
                }
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Whether prompts can be shown
fn interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
