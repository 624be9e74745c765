//! Serve command - host the interactive report view.

use std::sync::Arc;

use colored::Colorize;
use opsanalyst::{Analyst, AnalystConfig, MockProvider};

use crate::server::{app, state::AppState};

pub fn run(port: u16, no_open: bool, mock_llm: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AnalystConfig::from_env()?;
    let has_credential = config.has_credential();

    let analyst = if mock_llm {
        Analyst::with_provider(config, MockProvider::new().offline())
    } else {
        Analyst::from_config(config)?
    };
    let state = AppState::new(Arc::new(analyst));

    // Print server info
    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting report server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    if mock_llm {
        println!("  Model output: {}", "mock".yellow());
    } else if !has_credential {
        println!(
            "  {} GEMINI_API_KEY is not set; previews work but analysis will fail",
            "Warning:".yellow()
        );
    }
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    // Open browser if requested
    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}
