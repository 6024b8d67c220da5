//! Mock REST store for testing
//!
//! A wiremock server standing in for the catalog, `users` and `interactions`
//! tables, plus a `ServiceFactory` wired against it.

use std::time::Duration;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};
use AsanaBuddy::{
    config::Settings,
    models::{Posture, Series},
    services::ServiceFactory,
    state::SessionStore,
};

pub const TEST_API_KEY: &str = "test-anon-key";

/// Mock REST store server for testing
pub struct CatalogMockServer {
    pub server: MockServer,
}

impl CatalogMockServer {
    /// Create a new mock store server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Settings pointing the catalog at this server
    pub fn settings(&self, timeout_seconds: u64) -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "12345:test_token".to_string();
        settings.catalog.url = self.server.uri();
        settings.catalog.api_key = TEST_API_KEY.to_string();
        settings.catalog.timeout_seconds = timeout_seconds;
        settings
    }

    /// Services wired against this server, sharing `store`
    pub fn services(&self, store: &SessionStore) -> ServiceFactory {
        ServiceFactory::new(self.settings(5), store.clone()).expect("Failed to build services")
    }

    /// Services with a custom request timeout
    pub fn services_with_timeout(&self, store: &SessionStore, timeout_seconds: u64) -> ServiceFactory {
        ServiceFactory::new(self.settings(timeout_seconds), store.clone()).expect("Failed to build services")
    }

    /// Serve the posture list of one series
    pub async fn mock_series(&self, series: Series, postures: &[Posture]) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/asanas"))
            .and(query_param("order", "order_num.asc"))
            .and(query_param("series", format!("eq.{}", series.number())))
            .respond_with(ResponseTemplate::new(200).set_body_json(postures))
            .mount(&self.server)
            .await;
    }

    /// Serve single-posture lookups
    pub async fn mock_lookup(&self, posture: &Posture) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/asanas"))
            .and(query_param("id", format!("eq.{}", posture.id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![posture]))
            .mount(&self.server)
            .await;
    }

    /// Answer a single-posture lookup only after `delay`
    pub async fn mock_slow_lookup(&self, posture: &Posture, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/asanas"))
            .and(query_param("id", format!("eq.{}", posture.id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![posture]).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Answer the lookup of `posture_id` with an empty result set
    pub async fn mock_missing(&self, posture_id: i64) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/asanas"))
            .and(query_param("id", format!("eq.{}", posture_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&self.server)
            .await;
    }

    /// Fail every catalog read with the given status
    pub async fn mock_catalog_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/asanas"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": "unavailable"})))
            .mount(&self.server)
            .await;
    }

    /// Answer catalog reads only after `delay`
    pub async fn mock_slow_catalog(&self, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/asanas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Accept interaction inserts
    pub async fn mock_interactions(&self) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/interactions"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.server)
            .await;
    }

    /// Accept interaction inserts, answering only after `delay`
    pub async fn mock_slow_interactions(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/interactions"))
            .respond_with(ResponseTemplate::new(201).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Poll until `expected` interaction inserts arrived or two seconds pass.
    ///
    /// Inserts run in the background, so a flow can return before its
    /// interaction reaches the store.
    pub async fn wait_for_interactions(&self, expected: usize) -> Vec<Value> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let recorded = self.recorded_interactions().await;
            if recorded.len() >= expected || tokio::time::Instant::now() >= deadline {
                return recorded;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    /// Bodies of every interaction insert received so far
    pub async fn recorded_interactions(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() == "POST" && request.url.path() == "/rest/v1/interactions")
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
