//! Point d'entrée CLI pour survey-capture

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use survey_capture::ClientConfig;

/// Charge `.env` (répertoire courant puis répertoire du binaire)
fn load_env() {
    if dotenvy::dotenv().is_err() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Saisir des géométries de levé et les enregistrer dans le record store
#[derive(Parser)]
#[command(name = "survey-capture")]
#[command(author, version)]
#[command(about = "Capture survey geometries and exchange them with the record store")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Record store URL (défaut : env SURVEY_API_URL / http://localhost:5000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (défaut : env SURVEY_TIMEOUT_SECS / 30)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let config = ClientConfig::from_env().with_overrides(cli.api_url, cli.timeout);
    debug!(api_url = %config.api_url, timeout = ?config.timeout, "Client configuration");

    match cli.command {
        Commands::Capture {
            geometry_type,
            points,
            finish,
            coords,
            owner,
            date,
            srid,
            notes,
            dry_run,
        } => {
            cli::cmd_capture(
                &config,
                geometry_type,
                &points,
                finish,
                coords,
                owner,
                date,
                srid,
                notes,
                dry_run,
            )
            .await?;
        }
        Commands::Session { geometry_type } => {
            cli::cmd_session(&config, geometry_type).await?;
        }
        Commands::Search { owner } => {
            cli::cmd_search(&config, owner).await?;
        }
        Commands::Show { id } => {
            cli::cmd_show(&config, id).await?;
        }
        Commands::Preview {
            geometry_type,
            coords,
            srid,
        } => {
            cli::cmd_preview(&config, geometry_type, &coords, srid)?;
        }
        Commands::Health => {
            cli::cmd_health(&config).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
