//! CLI command definitions for the `fprov` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod login;
pub mod provision;
pub mod steps;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fortiprov_infra::config::DEFAULT_CONFIG_FILE;
use fortiprov_types::config::ServiceConfig;

/// Provision managed devices from a stored JSON-RPC request collection.
#[derive(Parser)]
#[command(name = "fprov", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the service configuration file.
    #[arg(long, global = true, env = "FORTIPROV_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Skip TLS certificate verification for device connections.
    #[arg(long, global = true, conflicts_with = "verify_tls")]
    pub insecure: bool,

    /// Require valid TLS certificates for device connections.
    #[arg(long, global = true)]
    pub verify_tls: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply global flag overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if self.insecure {
            config.device.accept_invalid_certs = true;
        }
        if self.verify_tls {
            config.device.accept_invalid_certs = false;
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API and static front end.
    Serve {
        /// Port to listen on (overrides server.port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides server.host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Log in to a device and print the session token.
    Login(login::LoginArgs),

    /// List the steps of the stored collection.
    #[command(alias = "ls")]
    Steps,

    /// Run the collection (or one named step) against a device.
    Provision(provision::ProvisionArgs),
}
