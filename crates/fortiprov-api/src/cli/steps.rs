//! `fprov steps` -- list the steps of the stored collection.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use fortiprov_core::store::CollectionStore;
use fortiprov_types::collection::Collection;

use crate::state::AppState;

pub async fn list_steps(state: &AppState, json: bool) -> Result<()> {
    let document = state.executor.store().load().await?;
    let collection = Collection::from_document(document)?;

    if json {
        let steps: Vec<serde_json::Value> = collection
            .item
            .iter()
            .map(|step| {
                serde_json::json!({
                    "name": step.name,
                    "has_body": step.raw_body().is_some(),
                    "executable": step.is_executable(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    if collection.item.is_empty() {
        println!();
        println!(
            "  {} Collection at {} has no steps.",
            style("i").blue().bold(),
            style(&state.config.collection.path).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Step").fg(Color::White),
        Cell::new("Runs").fg(Color::White),
    ]);

    for (index, step) in collection.item.iter().enumerate() {
        let runs = if step.is_login() {
            Cell::new("skipped (login)").fg(Color::DarkGrey)
        } else if step.raw_body().is_none() {
            Cell::new("skipped (no body)").fg(Color::DarkGrey)
        } else {
            Cell::new("yes").fg(Color::Green)
        };
        table.add_row(vec![Cell::new(index + 1), Cell::new(&step.name), runs]);
    }

    println!("{table}");
    println!(
        "  {} steps, {} executable",
        style(collection.item.len()).bold(),
        style(collection.item.iter().filter(|s| s.is_executable()).count()).bold()
    );

    Ok(())
}
