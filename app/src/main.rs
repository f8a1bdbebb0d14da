#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, InfoStrategy, InitStrategy, ListenStrategy, SeedStrategy, ServeInput,
    ServeStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "nutridash")]
#[command(about = "Food nutrition dashboard with live chat extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard and run the background listener
    Serve {
        /// Port to bind, overrides server.port
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not connect to the remote message stream
        #[arg(long)]
        no_listener: bool,
    },
    /// Run only the listener and log extracted records
    Listen,
    /// Create tables and load the food catalogue into the database
    Seed,
    /// Initialize configuration
    Init,
    /// Show configuration and database status
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, no_listener } => {
            ServeStrategy
                .execute(ServeInput { port, no_listener })
                .await?;
        }
        Commands::Listen => ListenStrategy.execute(()).await?,
        Commands::Seed => SeedStrategy.execute(()).await?,
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}
