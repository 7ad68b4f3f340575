//! `fprov login` -- obtain a device session from the command line.

use anyhow::Result;
use clap::Args;
use console::style;
use secrecy::SecretString;

use fortiprov_core::login::login as device_login;
use fortiprov_types::login::LoginRequest;

use crate::state::AppState;

#[derive(Args)]
pub struct LoginArgs {
    /// Device host or IP.
    #[arg(long)]
    pub ip: String,

    /// Admin user name.
    #[arg(short, long)]
    pub username: String,

    /// Password (prefer the environment variable).
    #[arg(long, env = "FPROV_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn login(state: &AppState, args: LoginArgs, json: bool) -> Result<()> {
    let request = LoginRequest {
        ip: args.ip,
        username: args.username,
        password: SecretString::from(args.password),
    };

    let response = device_login(state.executor.transport(), &request, state.login_timeout()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let session = match &response.session {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    println!();
    println!(
        "  {} {} to {}",
        style("✓").green().bold(),
        response.message,
        style(&request.ip).cyan()
    );
    println!();
    println!("  {} {}", style("Session:").bold(), style(session).yellow());
    println!();

    Ok(())
}
