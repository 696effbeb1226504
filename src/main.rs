use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[derive(Parser)]
#[command(name = "lorepatch")]
#[command(about = "Apply model-written edit directives to knowledge-base documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable verbose debug output")]
    verbose: bool,

    #[arg(long, global = true, help = "Perform a dry run without writing files")]
    dry_run: bool,

    #[arg(long, global = true, help = "Document root (defaults to $LOREPATCH_ROOT or .)")]
    root: Option<PathBuf>,

    #[arg(long, global = true, help = "Engine config file (defaults to $LOREPATCH_CONFIG or <root>/lorepatch.yml)")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the directives found in model output as JSON")]
    Parse {
        #[arg(help = "File with model output (stdin when omitted or '-')")]
        input: Option<PathBuf>,
    },

    #[command(about = "Check whether each directive would apply and preview it")]
    Validate {
        #[arg(help = "File with model output (stdin when omitted or '-')")]
        input: Option<PathBuf>,
    },

    #[command(about = "Apply directives to the documents under the root")]
    Apply {
        #[arg(help = "File with model output (stdin when omitted or '-')")]
        input: Option<PathBuf>,
    },

    #[command(about = "Show the apply journal and files edited outside lorepatch")]
    Journal,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "lorepatch=debug" } else { "lorepatch=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli::Config {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        root: cli
            .root
            .or_else(|| std::env::var_os("LOREPATCH_ROOT").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(".")),
        config_path: cli
            .config
            .or_else(|| std::env::var_os("LOREPATCH_CONFIG").map(PathBuf::from)),
    };

    match cli.command {
        Commands::Parse { input } => {
            cli::parse(input, &config).await?;
        }
        Commands::Validate { input } => {
            cli::validate(input, &config).await?;
        }
        Commands::Apply { input } => {
            cli::apply(input, &config).await?;
        }
        Commands::Journal => {
            cli::journal(&config).await?;
        }
    }

    Ok(())
}
