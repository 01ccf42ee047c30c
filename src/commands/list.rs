//! `orderpick list` command - page through orders

use std::path::Path;

use orderpick_core::config::EngineConfig;
use orderpick_core::error::Result;
use orderpick_core::fetch::{OrderByKey, OrderFetcher, PageParams, SortDirection, StaticOrderSource};

use crate::cli::{Cli, OutputFormat};

/// Paging and filter options for one listing
pub struct ListOptions<'a> {
    pub page: usize,
    pub page_size: Option<usize>,
    pub search: Option<&'a str>,
    pub sort_by: &'a str,
    pub direction: &'a str,
    pub bookable: bool,
}

/// Execute the list command
pub fn execute(cli: &Cli, config: &EngineConfig, orders: &Path, options: ListOptions<'_>) -> Result<()> {
    let source = StaticOrderSource::load(orders)?;

    let page_size = options.page_size.unwrap_or(config.selection.page_size);
    let key: OrderByKey = options.sort_by.parse()?;
    let direction: SortDirection = options.direction.parse()?;

    let mut params = PageParams::page(options.page, page_size).with_order(key, direction);
    if let Some(search) = options.search {
        params = params.with_search(search);
    }
    if options.bookable {
        params = params.bookable_only();
    }

    let page = source.fetch_orders(&params)?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        OutputFormat::Human => {
            if page.orders.is_empty() {
                if !cli.quiet {
                    println!("No orders found");
                }
                return Ok(());
            }
            for order in &page.orders {
                println!(
                    "{} {} [{}] {} line items",
                    order.id,
                    order.purchase_order_number.as_deref().unwrap_or("-"),
                    order.status.as_deref().unwrap_or("-"),
                    order.line_items.len()
                );
            }
            if !cli.quiet {
                let shown_from = params.after + 1;
                let shown_to = params.after + page.orders.len();
                println!("showing {}-{} of {}", shown_from, shown_to, page.total_count);
            }
        }
    }

    Ok(())
}
