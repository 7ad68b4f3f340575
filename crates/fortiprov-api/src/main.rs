//! FortiProv CLI and HTTP service entry point.
//!
//! Binary name: `fprov`
//!
//! Parses CLI arguments, loads `fortiprov.toml`, wires the executor to its
//! adapters, then dispatches to a command or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use console::style;

use fortiprov_infra::config::load_service_config;
use fortiprov_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let mut config = load_service_config(&cli.config).await;
    cli.apply_overrides(&mut config);

    let state = AppState::from_config(config)?;
    let outcome = dispatch(cli, state).await;

    shutdown_tracing();
    outcome
}

async fn dispatch(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { .. } => serve(state).await?,

        Commands::Login(args) => cli::login::login(&state, args, cli.json).await?,

        Commands::Steps => cli::steps::list_steps(&state, cli.json).await?,

        Commands::Provision(args) => {
            let failed = cli::provision::provision(&state, args, cli.json).await?;
            if failed > 0 {
                anyhow::bail!("{failed} step(s) failed");
            }
        }
    }

    Ok(())
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} FortiProv listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
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
}
