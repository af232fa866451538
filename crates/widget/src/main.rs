//! Standalone driver: `quotelink [MANUFACTURER [SEARCH TERM...]]`.
//!
//! Loads the manufacturer list, optionally scopes to one manufacturer and runs
//! a search, then prints what the widget would display.

use std::sync::Arc;

use anyhow::bail;
use quotelink_catalog::CatalogClient;
use quotelink_widget::render::WidgetView;
use quotelink_widget::{Outcome, StaticContext, UnavailableHost, WidgetConfig, WidgetController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quotelink_observability::init();

    let config = WidgetConfig::from_env();
    if config.catalog.api_key.is_empty() {
        tracing::warn!("QUOTELINK_API_KEY not set; requests will likely be rejected");
    }

    let mut args = std::env::args().skip(1);
    let manufacturer = args.next();
    let term = args.collect::<Vec<_>>().join(" ");

    let client = CatalogClient::new(&config.catalog);
    let controller = WidgetController::new(
        client,
        config,
        &StaticContext::TopLevel,
        Arc::new(UnavailableHost),
    );

    if controller.load_manufacturers().await == Outcome::Failed {
        print_view(&controller.view());
        bail!("manufacturer lookup failed");
    }

    let Some(manufacturer) = manufacturer else {
        print_view(&controller.view());
        return Ok(());
    };

    let mut outcome = controller.select_manufacturer(&manufacturer).await;
    if outcome == Outcome::Applied && !term.is_empty() {
        outcome = controller.search_products(&term).await;
    }

    print_view(&controller.view());
    if outcome == Outcome::Failed {
        bail!("product search failed");
    }
    Ok(())
}

fn print_view(view: &WidgetView) {
    println!("[{}] {}", view.status.as_str(), view.status_text);

    if let Some(error) = &view.error {
        println!("error: {}", error.message);
    }

    if view.selected_manufacturer.is_none() {
        if let Some(stats) = &view.manufacturer_stats {
            println!("{stats}");
        }
        for option in view.manufacturer_options.iter().skip(1) {
            println!("  {}", option.label);
        }
        return;
    }

    if let Some(results) = &view.results {
        println!("{} ({})", results.count_text, results.search_stats);
        if let Some(empty) = &results.empty_text {
            println!("  {empty}");
        }
        for row in &results.rows {
            println!("  {:>3}  {:<24} {:<54} {}", row.index, row.part_number, row.description, row.price);
        }
    }
}
