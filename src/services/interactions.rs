//! Interaction logging service
//!
//! Records usage (learn/test starts) and keeps the user's latest interaction
//! timestamp fresh. `record` and `touch_user` run on a spawned task so a slow
//! store never holds up the user's flow; failures are logged and swallowed.

use chrono::Utc;
use reqwest::{Client, StatusCode};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use crate::models::{InteractionKind, CreateInteractionRequest, CreateUserRequest, UpdateUserRequest};
use crate::utils::errors::{AsanaBuddyError, Result};

/// Usage tracking client for the store's `users` and `interactions` tables
#[derive(Clone, Debug)]
pub struct InteractionService {
    client: Client,
    base_url: String,
}

impl InteractionService {
    /// Create a new InteractionService instance
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Record a completed action in the background.
    ///
    /// Returns at once; the handle only matters to callers that want to wait.
    pub fn record(&self, user_id: i64, kind: InteractionKind, number_of_asanas: u32) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            match service.try_record(user_id, kind, number_of_asanas).await {
                Ok(()) => debug!(user_id = user_id, kind = kind.as_str(), number_of_asanas = number_of_asanas, "Interaction recorded"),
                Err(e) => warn!(user_id = user_id, kind = kind.as_str(), error = %e, "Failed to record interaction"),
            }
        })
    }

    /// Refresh (or create) the user row in the background
    pub fn touch_user(&self, chat_id: i64) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.try_touch_user(chat_id).await {
                warn!(chat_id = chat_id, error = %e, "Failed to upsert user");
            }
        })
    }

    /// `POST /interactions`
    pub async fn try_record(&self, user_id: i64, kind: InteractionKind, number_of_asanas: u32) -> Result<()> {
        let body = CreateInteractionRequest {
            user_id,
            kind,
            number_of_asanas,
        };

        let response = self.client
            .post(format!("{}/interactions", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AsanaBuddyError::UsageStore { table: "interactions", status: status.as_u16() });
        }
        Ok(())
    }

    /// `PATCH /users?chat_id=eq.ID`, falling back to `POST /users`.
    ///
    /// A 409 on insert means the row already exists and counts as success.
    pub async fn try_touch_user(&self, chat_id: i64) -> Result<()> {
        let now = Utc::now();
        let users_url = format!("{}/users", self.base_url);

        let response = self.client
            .patch(&users_url)
            .query(&[("chat_id", format!("eq.{}", chat_id))])
            .header("Prefer", "return=representation")
            .json(&UpdateUserRequest { latest_interaction: now })
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            let updated: Vec<serde_json::Value> = response.json().await.unwrap_or_default();
            if !updated.is_empty() {
                debug!(chat_id = chat_id, "User interaction timestamp updated");
                return Ok(());
            }
        }

        let response = self.client
            .post(&users_url)
            .json(&CreateUserRequest { chat_id, latest_interaction: now })
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                debug!(chat_id = chat_id, "User created");
                Ok(())
            }
            StatusCode::CONFLICT => {
                debug!(chat_id = chat_id, "User already exists");
                Ok(())
            }
            status => Err(AsanaBuddyError::UsageStore { table: "users", status: status.as_u16() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::services::catalog::{build_store_client, rest_root};
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wiremock::{
        matchers::{body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn service_for(server: &MockServer) -> InteractionService {
        let config = CatalogConfig {
            url: server.uri(),
            api_key: "anon-key".to_string(),
            timeout_seconds: 5,
        };
        InteractionService::new(build_store_client(&config).unwrap(), rest_root(&config))
    }

    #[tokio::test]
    async fn test_record_posts_interaction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/interactions"))
            .and(body_partial_json(json!({"user_id": 77, "type": "learn", "number_of_asanas": 4})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        assert!(service_for(&server).try_record(77, InteractionKind::Learn, 4).await.is_ok());
    }

    #[tokio::test]
    async fn test_record_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/interactions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = service_for(&server);
        assert_matches!(
            service.try_record(77, InteractionKind::Test, 10).await,
            Err(AsanaBuddyError::UsageStore { table: "interactions", status: 500 })
        );
        assert!(service.record(77, InteractionKind::Test, 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_record_returns_before_slow_store_answers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/interactions"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let started = Instant::now();
        let handle = service.record(77, InteractionKind::Learn, 3);
        let user = service.touch_user(77);
        assert!(started.elapsed() < Duration::from_millis(200));

        handle.await.unwrap();
        user.await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_touch_user_reports_failed_insert() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert_matches!(
            service_for(&server).try_touch_user(8).await,
            Err(AsanaBuddyError::UsageStore { table: "users", status: 503 })
        );
    }

    #[tokio::test]
    async fn test_touch_existing_user_only_patches() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/users"))
            .and(query_param("chat_id", "eq.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"chat_id": 5}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        assert!(service_for(&server).try_touch_user(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_touch_new_user_inserts_and_accepts_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .and(body_partial_json(json!({"chat_id": 6})))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;

        assert!(service_for(&server).try_touch_user(6).await.is_ok());
    }
}
