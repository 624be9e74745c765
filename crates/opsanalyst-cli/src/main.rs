//! Opsanalyst CLI - AI operations analyst for business CSV data.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            file,
            model,
            output_dir,
            pdf,
            html,
            summary,
            precision,
            delimiter,
            mock_llm,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            file,
            model,
            output_dir,
            pdf,
            html,
            summary,
            precision,
            delimiter,
            mock_llm,
            verbose: cli.verbose,
        }),

        Commands::Describe { file, delimiter } => commands::describe::run(file, delimiter),

        Commands::Models => commands::models::run(),

        Commands::Serve {
            port,
            no_open,
            mock_llm,
        } => commands::serve::run(port, no_open, mock_llm),
    };

    if let Err(e) = result {
        match e.downcast_ref::<opsanalyst::AnalystError>() {
            Some(err) => {
                tracing::debug!("{}", err);
                eprintln!("Error: {}", err.user_message());
            }
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
