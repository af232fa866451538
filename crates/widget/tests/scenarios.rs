//! End-to-end controller scenarios against an in-process catalog service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::routing::get;
use quotelink_catalog::CatalogClient;
use quotelink_core::QuotePayload;
use quotelink_widget::config::messages;
use quotelink_widget::{
    HostError, HostingMode, Outcome, QuoteHost, StaticContext, Status, UnavailableHost,
    WidgetConfig, WidgetController,
};
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn config(&self) -> WidgetConfig {
        let mut config = WidgetConfig::default();
        config.catalog.base_url = self.base_url.clone();
        config.catalog.api_key = "test-key".to_string();
        config
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn catalog_app() -> Router {
    Router::new()
        .route(
            "/functions/v1/manufacturer-lookup",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": {"manufacturers": [{"manufacturer_name": "Acme", "product_count": 3}]}
                }))
            }),
        )
        .route("/functions/v1/hybrid-product-lookup", get(products))
}

/// Search terms starting with "slow" are answered late.
async fn products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let term = params.get("search").cloned().unwrap_or_default();
    if term.starts_with("slow") {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    let part = if term.is_empty() { "X1".to_string() } else { term.to_uppercase() };
    Json(json!({
        "success": true,
        "data": {
            "products": [{
                "manufacturer_part_number": part,
                "part_description": "Widget",
                "manufacturer_name": "Acme",
                "msrp": 9.99,
                "source": "catalog"
            }],
            "query_info": {"search_term": term}
        }
    }))
}

#[derive(Default)]
struct RecordingHost {
    payloads: Mutex<Vec<QuotePayload>>,
}

impl QuoteHost for RecordingHost {
    fn populate(&self, payload: &QuotePayload) -> Result<(), HostError> {
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

fn standalone(config: WidgetConfig) -> WidgetController<CatalogClient> {
    let client = CatalogClient::new(&config.catalog);
    WidgetController::new(client, config, &StaticContext::TopLevel, Arc::new(UnavailableHost))
}

#[tokio::test]
async fn manufacturer_list_is_exposed() {
    let srv = TestServer::spawn(catalog_app()).await;
    let ctl = standalone(srv.config());

    assert_eq!(ctl.load_manufacturers().await, Outcome::Applied);

    let st = ctl.state();
    assert_eq!(st.manufacturers.len(), 1);
    assert_eq!(st.manufacturers[0].name, "Acme");
    assert_eq!(st.manufacturers[0].product_count, 3);
    assert_eq!(st.status, Status::Success);
    assert_eq!(ctl.view().manufacturer_options[1].label, "Acme (3 products)");
}

#[tokio::test]
async fn selecting_manufacturer_shows_first_page() {
    let srv = TestServer::spawn(catalog_app()).await;
    let ctl = standalone(srv.config());

    assert_eq!(ctl.select_manufacturer("Acme").await, Outcome::Applied);

    let st = ctl.state();
    assert_eq!(st.current_results().len(), 1);
    assert_eq!(st.current_results()[0].part_number, "X1");
    assert_eq!(st.current_results()[0].msrp, Some(9.99));
    assert_eq!(st.status, Status::Success);

    let results = ctl.view().results.unwrap();
    assert_eq!(results.search_stats, messages::SHOWING_ALL);
    assert_eq!(results.rows[0].price, "$9.99");
}

#[tokio::test]
async fn superseded_search_never_lands() {
    let srv = TestServer::spawn(catalog_app()).await;
    let ctl = standalone(srv.config());
    ctl.select_manufacturer("Acme").await;

    let slow = tokio::spawn({
        let ctl = ctl.clone();
        async move { ctl.search_products("slow-one").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = ctl.search_products("fast").await;

    assert_eq!(fast, Outcome::Applied);
    assert_eq!(slow.await.unwrap(), Outcome::Discarded);

    let st = ctl.state();
    assert_eq!(st.current_results().len(), 1);
    assert_eq!(st.current_results()[0].part_number, "FAST");
    assert_eq!(ctl.view().results.unwrap().search_stats, "Searching for \"fast\"");
}

#[tokio::test]
async fn manufacturer_lookup_timeout_shows_error() {
    let app = Router::new().route(
        "/functions/v1/manufacturer-lookup",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({"success": true, "data": {"manufacturers": []}}))
        }),
    );
    let srv = TestServer::spawn(app).await;
    let mut config = srv.config();
    config.catalog.timeout_ms = 50;
    let ctl = standalone(config);

    assert_eq!(ctl.load_manufacturers().await, Outcome::Failed);

    let st = ctl.state();
    assert_eq!(st.status, Status::Error);
    assert!(st.current_results().is_empty());
    assert_eq!(st.error.unwrap().message, messages::API_ERROR);
}

#[tokio::test]
async fn staging_inside_crm_hands_payload_to_host() {
    let srv = TestServer::spawn(catalog_app()).await;
    let config = srv.config();
    let host = Arc::new(RecordingHost::default());
    let ctl = WidgetController::new(
        CatalogClient::new(&config.catalog),
        config,
        &StaticContext::framed_by("crm.zoho.com"),
        host.clone(),
    );
    assert_eq!(ctl.mode(), HostingMode::HostedByTarget);

    ctl.select_manufacturer("Acme").await;
    assert_eq!(ctl.select_index(0), Outcome::Applied);
    assert_eq!(ctl.stage_for_quote(), Outcome::Applied);
    assert_eq!(ctl.state().status, Status::Success);

    let payloads = host.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    let payload = payloads[0].to_json();
    assert_eq!(payload["Product_Code"], "X1");
    assert_eq!(payload["Product_Name"], "Widget");
    assert_eq!(payload["Unit_Price"], 9.99);
    assert_eq!(payload["Manufacturer"], "Acme");
}
