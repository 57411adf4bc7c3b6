//! Bundler CLI and REST API entry point.
//!
//! Binary name: `bundler`
//!
//! Parses CLI arguments, sets up tracing, opens the data directory, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::bail;
use clap::Parser;
use clap_complete::generate;

use bundler_observe::tracing_setup::{TracingOptions, default_filter, init_tracing, shutdown_tracing};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "bundler", &mut std::io::stdout());
        return Ok(());
    }

    // The OTel stdout exporter would interleave with the function output.
    if cli.otel && matches!(cli.command, Commands::CartTransform { .. }) {
        bail!("--otel cannot be combined with cart-transform");
    }

    init_tracing(&TracingOptions {
        default_filter: default_filter(cli.verbosity()).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = dispatch(cli).await;
    shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    // The cart transform is a pure function of its input
    if let Commands::CartTransform { input, pretty } = &cli.command {
        return cli::cart_transform::run(input.as_deref(), *pretty).await;
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Create { resume, token } => {
            if resume {
                cli::wizard::run_resume(&state, token).await?;
            } else {
                cli::wizard::run_create(&state, token).await?;
            }
        }

        Commands::Drafts => {
            cli::bundle::list_drafts(&state, cli.json).await?;
        }

        Commands::List { limit } => {
            cli::bundle::list_bundles(&state, limit, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::bundle::show_bundle(&state, &id, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!();
            println!(
                "  {} Bundler API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {} {}",
                console::style("Data:").dim(),
                state.data_dir.display()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());
            tracing::info!(%addr, "api server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::CartTransform { .. } | Commands::Completions { .. } => {
            unreachable!("handled above")
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
