//! `orderpick select` command - replay a selection session
//!
//! Loads every page of orders into a session, applies the scripted toggles
//! in order, and prints the final selection with per-order coverage.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use orderpick_core::aggregate::Coverage;
use orderpick_core::config::EngineConfig;
use orderpick_core::error::{OrderpickError, Result};
use orderpick_core::fetch::{OrderFetcher, PageParams, StaticOrderSource};
use orderpick_core::guard::ActionMode;
use orderpick_core::model::{LineItemId, OrderId, SelectionEntry};
use orderpick_core::session::SelectionSession;

use crate::cli::{Cli, OutputFormat};

/// One scripted user action
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptStep {
    ToggleOrder(OrderId),
    ToggleLineItem { order: OrderId, line_item: LineItemId },
}

/// Execute the select command
pub fn execute(
    cli: &Cli,
    config: &EngineConfig,
    orders: &Path,
    script: Option<&Path>,
    mode: Option<ActionMode>,
    existing: Option<&Path>,
) -> Result<()> {
    let source = StaticOrderSource::load(orders)?;
    let mode = mode.unwrap_or(config.selection.action_mode);

    let existing = match existing {
        Some(path) => read_json::<Vec<SelectionEntry>>(path)?,
        None => Vec::new(),
    };
    let owning: Vec<_> = source
        .orders()
        .iter()
        .filter(|order| existing.iter().any(|entry| entry.belongs_to(order)))
        .cloned()
        .collect();

    tracing::debug!(%mode, existing = existing.len(), "starting selection session");
    let mut session = SelectionSession::with_existing(mode, existing, owning);

    load_all_pages(&source, config, &mut session)?;

    let steps = match script {
        Some(path) => read_json::<Vec<ScriptStep>>(path)?,
        None => Vec::new(),
    };
    for step in &steps {
        apply_step(&mut session, step)?;
    }

    let coverage: Vec<(OrderId, Coverage)> = session
        .catalog()
        .iter()
        .map(|order| (order.id.clone(), session.classify_order(order)))
        .collect();
    let outcome = session.finish();

    match cli.format {
        OutputFormat::Json => {
            let coverage: serde_json::Map<String, serde_json::Value> = coverage
                .iter()
                .map(|(id, c)| (id.to_string(), serde_json::to_value(c).unwrap_or_default()))
                .collect();
            let output = serde_json::json!({
                "selected": outcome.selected,
                "orders": outcome.orders,
                "allOrders": outcome.all_orders,
                "coverage": coverage,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for (id, c) in &coverage {
                println!("{} {} ({})", c.icon_hint(), id, c);
            }
            if !cli.quiet {
                println!();
            }
            for entry in &outcome.selected {
                let identity = entry.identity().map(|id| id.as_str()).unwrap_or("-");
                let order = entry.order_id().map(|id| id.as_str()).unwrap_or("-");
                match entry.sequence() {
                    Some(seq) => println!("{:>3}. {} (order {})", seq, identity, order),
                    None => println!("  -  {} (order {})", identity, order),
                }
            }
            if !cli.quiet {
                println!(
                    "{} line items selected across {} orders",
                    outcome.selected.len(),
                    outcome.orders.len()
                );
            }
        }
    }

    Ok(())
}

fn load_all_pages(
    source: &StaticOrderSource,
    config: &EngineConfig,
    session: &mut SelectionSession,
) -> Result<()> {
    let mut index = 0;
    loop {
        let mut params = PageParams::page(index, config.selection.page_size);
        if config.selection.show_only_bookable {
            params = params.bookable_only();
        }
        let page = source.fetch_orders(&params)?;
        let fetched = params.after + page.orders.len();
        let total = page.total_count;
        let empty = page.orders.is_empty();
        session.ingest_page(page);

        if empty || fetched >= total {
            return Ok(());
        }
        index += 1;
    }
}

fn apply_step(session: &mut SelectionSession, step: &ScriptStep) -> Result<()> {
    match step {
        ScriptStep::ToggleOrder(order_id) => {
            let order = session
                .catalog_order(order_id)
                .cloned()
                .ok_or_else(|| OrderpickError::not_found("order", order_id))?;
            let change = session.toggle_order(&order);
            tracing::debug!(
                order = %order_id,
                added = change.added.len(),
                removed = change.removed.len(),
                "toggle_order"
            );
        }
        ScriptStep::ToggleLineItem { order: order_id, line_item } => {
            let order = session
                .catalog_order(order_id)
                .cloned()
                .ok_or_else(|| OrderpickError::not_found("order", order_id))?;
            let item = order
                .line_item(line_item)
                .cloned()
                .ok_or_else(|| OrderpickError::not_found("line item", line_item))?;
            let change = session.toggle_line_item(&item, &order);
            if change.protected > 0 {
                tracing::info!(line_item = %line_item, "line item is protected in edit mode");
            }
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| OrderpickError::invalid_input(path.display(), e))
}
