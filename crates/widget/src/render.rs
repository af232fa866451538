//! Presentation mapping: controller state → display structures.
//!
//! Everything here is a pure function of its inputs. A shell (terminal, web
//! view, CRM sidebar) renders [`WidgetView`] and feeds user actions back into
//! the controller.

use quotelink_core::{Manufacturer, Product, ProductPage};
use serde::Serialize;

use crate::config::{WidgetConfig, messages};
use crate::environment::HostingMode;
use crate::state::{ControllerState, ErrorBanner, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerOption {
    /// Empty for the placeholder entry.
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub index: usize,
    pub part_number: String,
    pub description: String,
    pub price: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub count_text: String,
    pub search_stats: String,
    pub rows: Vec<ProductRow>,
    /// Shown instead of rows when the page is empty.
    pub empty_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Everything the display surface needs, derived from controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetView {
    pub mode: HostingMode,
    pub status: Status,
    pub status_text: String,
    pub manufacturer_spinner: bool,
    pub product_spinner: bool,
    pub manufacturer_options: Vec<ManufacturerOption>,
    pub manufacturer_select_enabled: bool,
    pub manufacturer_stats: Option<String>,
    pub selected_manufacturer: Option<String>,
    pub search_visible: bool,
    pub results: Option<ResultsView>,
    pub selected_product: Option<Vec<DetailRow>>,
    pub notice: Option<String>,
    pub error: Option<ErrorBanner>,
}

pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn truncate_description(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// A zero price reads as "no price" on the display surface.
fn shown_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| *p > 0.0)
}

pub fn manufacturer_options(manufacturers: &[Manufacturer]) -> Vec<ManufacturerOption> {
    std::iter::once(ManufacturerOption {
        value: String::new(),
        label: messages::SELECT_PLACEHOLDER.to_string(),
    })
    .chain(manufacturers.iter().map(|m| ManufacturerOption {
        value: m.name.clone(),
        label: format!("{} ({} products)", m.name, m.product_count),
    }))
    .collect()
}

pub fn manufacturer_stats(manufacturers: &[Manufacturer]) -> String {
    format!("{} manufacturers available", manufacturers.len())
}

pub fn results_count_text(page: &ProductPage) -> String {
    let displayed = page.products.len() as u64;
    let total = page.total_available.unwrap_or(displayed);
    if total > displayed {
        format!("Showing {displayed} of {total} products")
    } else {
        format!("{displayed} products found")
    }
}

pub fn search_stats(page: &ProductPage) -> String {
    match page.search_term.as_deref() {
        Some(term) if !term.is_empty() => format!("Searching for \"{term}\""),
        _ => messages::SHOWING_ALL.to_string(),
    }
}

pub fn results_view(
    page: &ProductPage,
    selected: Option<&Product>,
    config: &WidgetConfig,
) -> ResultsView {
    let rows = page
        .products
        .iter()
        .enumerate()
        .map(|(index, product)| ProductRow {
            index,
            part_number: product.part_number.clone(),
            description: truncate_description(&product.description, config.description_limit),
            price: match shown_price(product.msrp) {
                Some(p) if config.features.pricing_display => format_price(p),
                _ => messages::PRICE_ON_REQUEST.to_string(),
            },
            selected: selected == Some(product),
        })
        .collect::<Vec<_>>();

    ResultsView {
        count_text: results_count_text(page),
        search_stats: search_stats(page),
        empty_text: rows
            .is_empty()
            .then(|| messages::NO_PRODUCTS.to_string()),
        rows,
    }
}

pub fn product_details(product: &Product) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow {
            label: "Part Number",
            value: product.part_number.clone(),
        },
        DetailRow {
            label: "Description",
            value: product.description.clone(),
        },
        DetailRow {
            label: "Manufacturer",
            value: product.manufacturer_name.clone(),
        },
    ];
    if let Some(msrp) = shown_price(product.msrp) {
        rows.push(DetailRow {
            label: "MSRP",
            value: format_price(msrp),
        });
    }
    if let Some(contract) = shown_price(product.contract_price) {
        rows.push(DetailRow {
            label: "Contract Price",
            value: format_price(contract),
        });
    }
    rows.push(DetailRow {
        label: "Source",
        value: product.source.label().to_string(),
    });
    rows
}

pub fn view(state: &ControllerState, mode: HostingMode, config: &WidgetConfig) -> WidgetView {
    WidgetView {
        mode,
        status: state.status,
        status_text: state.status_message.clone(),
        manufacturer_spinner: state.loading_manufacturers,
        product_spinner: state.searching,
        manufacturer_options: manufacturer_options(&state.manufacturers),
        manufacturer_select_enabled: state.manufacturers_loaded,
        manufacturer_stats: state
            .manufacturers_loaded
            .then(|| manufacturer_stats(&state.manufacturers)),
        selected_manufacturer: state.selected_manufacturer.clone(),
        search_visible: state.selected_manufacturer.is_some(),
        results: state
            .current_page
            .as_ref()
            .map(|page| results_view(page, state.selected_product.as_ref(), config)),
        selected_product: state.selected_product.as_ref().map(product_details),
        notice: state.notice.clone(),
        error: state.error.clone(),
    }
}
