use anyhow::Result;
use clap::{Parser, Subcommand};
use showcase_core::config::AppConfig;
use showcase_infrastructure::{ConfigService, ShowcasePaths};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use commands::projects::ProjectArgs;

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Showcase CLI - browse and manage student projects", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config.toml in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding config.toml and session.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Origin of the remote service; overrides the config file and SHOWCASE_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the stored session
    Logout,
    /// Create an account (administrators only)
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        repeat_password: String,
        /// Grant the new account administrator rights
        #[arg(long)]
        admin: bool,
    },
    /// Show the current session
    Status,
    /// Browse and manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    /// Enter a route such as `/profile/<id>`, applying its guards
    Navigate { path: String },
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// List the complete catalog
    List,
    /// List the projects of one creator (defaults to the signed-in user)
    Mine {
        #[arg(long)]
        creator: Option<String>,
    },
    /// Show a single project
    Show { id: String },
    /// Create a project
    Create(ProjectArgs),
    /// Change an existing project; omitted fields keep their value
    Update {
        id: String,
        #[command(flatten)]
        fields: ProjectArgs,
    },
    /// Delete a project
    Delete { id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ShowcasePaths::new(cli.config_dir.as_deref());
    let config = load_config(&cli, &paths)?;
    init_logging(&config.logging.level);

    let app = app::App::build(config, &paths)?;

    let outcome = match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&app, &email, &password).await
        }
        Commands::Logout => commands::session::logout(&app),
        Commands::Signup {
            email,
            password,
            repeat_password,
            admin,
        } => commands::session::signup(&app, &email, &password, &repeat_password, admin).await,
        Commands::Status => commands::session::status(&app),
        Commands::Projects { action } => match action {
            ProjectsAction::List => commands::projects::list(&app).await,
            ProjectsAction::Mine { creator } => {
                commands::projects::mine(&app, creator.as_deref()).await
            }
            ProjectsAction::Show { id } => commands::projects::show(&app, &id).await,
            ProjectsAction::Create(fields) => commands::projects::create(&app, fields).await,
            ProjectsAction::Update { id, fields } => {
                commands::projects::update(&app, &id, fields).await
            }
            ProjectsAction::Delete { id } => commands::projects::delete(&app, &id).await,
        },
        Commands::Navigate { path } => commands::navigate::navigate(&app, &path),
    };

    // Deferred notifications are delivered before exiting, even on failure
    app.settle().await;
    outcome
}

fn load_config(cli: &Cli, paths: &ShowcasePaths) -> Result<AppConfig> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(paths)?,
    };
    let mut config = service.get_config()?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }

    Ok(config)
}

/// Logs to stderr; `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
