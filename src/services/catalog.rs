//! Catalog service implementation
//!
//! This service reads posture rows from the remote REST store. Transient
//! failures degrade to empty results so the flows can keep going; only a
//! timed-out request is reported back, letting the user retry the action.

use std::time::Duration;
use reqwest::{Client, header::{HeaderMap, HeaderValue, AUTHORIZATION}};
use tracing::{debug, warn};
use crate::config::CatalogConfig;
use crate::models::{Posture, Series};
use crate::utils::errors::{AsanaBuddyError, CatalogError, Result};
use crate::utils::logging::log_api_error;

/// Build the HTTP client shared by all store services.
///
/// Every request carries the API key and bearer token the store expects.
pub fn build_store_client(config: &CatalogConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    let api_key = HeaderValue::from_str(&config.api_key)
        .map_err(|e| AsanaBuddyError::Config(format!("Invalid catalog API key: {}", e)))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|e| AsanaBuddyError::Config(format!("Invalid catalog API key: {}", e)))?;
    headers.insert("apikey", api_key);
    headers.insert(AUTHORIZATION, bearer);

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .user_agent("AsanaBuddy-Bot/1.0")
        .build()?;

    Ok(client)
}

/// REST root for a project base URL
pub fn rest_root(config: &CatalogConfig) -> String {
    format!("{}/rest/v1", config.url.trim_end_matches('/'))
}

/// Read-only client for the posture catalog
#[derive(Clone, Debug)]
pub struct CatalogService {
    client: Client,
    base_url: String,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// List postures sorted by order number, optionally restricted to one series.
    ///
    /// Non-success statuses and connection failures yield an empty list.
    pub async fn list_postures(&self, series: Option<Series>) -> Result<Vec<Posture>> {
        let url = format!("{}/asanas", self.base_url);
        let mut params = vec![("order", "order_num.asc".to_string())];
        if let Some(series) = series {
            params.push(("series", format!("eq.{}", series.number())));
        }

        debug!(series = ?series, "Fetching postures from catalog");

        let Some(mut postures) = self.fetch_rows(&url, &params).await? else {
            return Ok(Vec::new());
        };
        postures.sort_by_key(|p| p.order_num);

        debug!(series = ?series, count = postures.len(), "Fetched postures");
        Ok(postures)
    }

    /// Fetch a single posture by identifier
    pub async fn get_posture(&self, id: i64) -> Result<Option<Posture>> {
        let url = format!("{}/asanas", self.base_url);
        let params = vec![("id", format!("eq.{}", id))];

        debug!(posture_id = id, "Fetching posture from catalog");

        let posture = self
            .fetch_rows(&url, &params)
            .await?
            .and_then(|rows| rows.into_iter().next());

        if posture.is_none() {
            debug!(posture_id = id, "Posture not found");
        }
        Ok(posture)
    }

    /// Run a catalog query; `None` means the store gave nothing usable.
    async fn fetch_rows(&self, url: &str, params: &[(&str, String)]) -> Result<Option<Vec<Posture>>> {
        let response = match self.client.get(url).query(params).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(url = %url, "Catalog request timed out");
                return Err(CatalogError::Timeout.into());
            }
            Err(e) => {
                log_api_error("catalog", &e.to_string(), Some(url));
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Catalog returned non-success status");
            return Ok(None);
        }

        match response.json::<Vec<Posture>>().await {
            Ok(rows) => Ok(Some(rows)),
            Err(e) if e.is_timeout() => Err(CatalogError::Timeout.into()),
            Err(e) => {
                let error = CatalogError::InvalidResponse(e.to_string());
                log_api_error("catalog", &error.to_string(), Some(url));
                Ok(None)
            }
        }
    }
}
