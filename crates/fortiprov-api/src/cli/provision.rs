//! `fprov provision` -- run the collection against a device from the command line.

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use secrecy::SecretString;

use fortiprov_types::provision::{ProvisionRequest, ProvisionResponse, StepStatus};

use crate::state::AppState;

#[derive(Args)]
pub struct ProvisionArgs {
    /// Device host or IP.
    #[arg(long)]
    pub ip: String,

    /// Session token from `fprov login`.
    #[arg(long, env = "FPROV_SESSION", hide_env_values = true)]
    pub session: String,

    #[arg(long, default_value = "root")]
    pub adom: String,

    #[arg(long)]
    pub dns_primary: String,

    #[arg(long)]
    pub dns_secondary: String,

    #[arg(long)]
    pub faz_target_ip: String,

    #[arg(long)]
    pub faz_target_sn: String,

    #[arg(long)]
    pub corp_lan_subnet: String,

    #[arg(long)]
    pub corp_lan_netmask: String,

    /// `all` or `single`.
    #[arg(long, default_value = "all", value_parser = ["all", "single"])]
    pub scope: String,

    /// Step name to run when scope is `single`.
    #[arg(long)]
    pub step: Option<String>,
}

impl From<ProvisionArgs> for ProvisionRequest {
    fn from(args: ProvisionArgs) -> Self {
        ProvisionRequest {
            ip: args.ip,
            session: SecretString::from(args.session),
            adom: args.adom,
            dns_primary: args.dns_primary,
            dns_secondary: args.dns_secondary,
            faz_target_ip: args.faz_target_ip,
            faz_target_sn: args.faz_target_sn,
            corp_lan_subnet: args.corp_lan_subnet,
            corp_lan_netmask: args.corp_lan_netmask,
            scope: args.scope,
            step_name: args.step,
        }
    }
}

/// Run provisioning and print the results. Returns the number of failed steps.
pub async fn provision(state: &AppState, args: ProvisionArgs, json: bool) -> Result<usize> {
    let request = ProvisionRequest::from(args);
    let scope = request.scope()?;
    let variables = request.variables();

    let results = state.executor.run(&request.ip, &scope, &variables).await?;
    let response = ProvisionResponse { results };
    let failed = response.failed_count();

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(failed);
    }

    if response.results.is_empty() {
        println!();
        println!("  {} No executable steps in scope.", style("i").blue().bold());
        println!();
        return Ok(0);
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Step").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for result in &response.results {
        let status = match result.status {
            StepStatus::Success => Cell::new("✓ success").fg(Color::Green),
            StepStatus::Error => Cell::new("✗ error").fg(Color::Red),
        };
        table.add_row(vec![Cell::new(&result.name), status, Cell::new(&result.message)]);
    }

    println!("{table}");
    let summary = format!(
        "{} of {} steps succeeded",
        response.results.len() - failed,
        response.results.len()
    );
    if failed == 0 {
        println!("  {}", style(summary).green());
    } else {
        println!("  {}", style(summary).red());
    }

    Ok(failed)
}
