//! Browse flow engine
//!
//! Drives sequential study of a user-chosen order-number range of one series.

use tracing::info;
use crate::models::{InteractionKind, Series};
use crate::services::{CatalogService, InteractionService};
use crate::utils::errors::Result;
use crate::utils::logging::log_flow_event;
use super::session::{BrowseStep, Direction};
use super::storage::SessionStore;

#[derive(Clone, Debug)]
pub struct BrowseFlow {
    catalog: CatalogService,
    interactions: InteractionService,
    store: SessionStore,
}

impl BrowseFlow {
    pub fn new(catalog: CatalogService, interactions: InteractionService, store: SessionStore) -> Self {
        Self {
            catalog,
            interactions,
            store,
        }
    }

    /// Create a browse session over `start..=end` of the series.
    ///
    /// An empty range still creates a session, which reads as completed.
    pub async fn start(&self, user_id: i64, series: Series, start: u32, end: u32) -> Result<BrowseStep> {
        let postures: Vec<_> = self
            .catalog
            .list_postures(Some(series))
            .await?
            .into_iter()
            .filter(|p| p.in_range(start, end))
            .collect();
        let count = postures.len() as u32;

        info!(user_id = user_id, series = %series, start = start, end = end, count = count, "Starting browse session");
        self.store.set_browse_session(user_id, postures, 0);
        self.interactions.record(user_id, InteractionKind::Learn, count);

        Ok(self.current(user_id))
    }

    /// Step forwards or backwards and return what is now shown
    pub fn advance(&self, user_id: i64, direction: Direction) -> BrowseStep {
        let step = self.store.with_browse(user_id, |browse| {
            browse.advance(direction);
            browse.current()
        });

        match step {
            Some(step) => {
                let event = match (&step, direction) {
                    (BrowseStep::Completed, _) => "completed",
                    (_, Direction::Next) => "next",
                    (_, Direction::Previous) => "previous",
                };
                log_flow_event(user_id, "browse", event);
                step
            }
            None => BrowseStep::NoSession,
        }
    }

    pub fn current(&self, user_id: i64) -> BrowseStep {
        self.store
            .with_browse(user_id, |browse| browse.current())
            .unwrap_or(BrowseStep::NoSession)
    }
}
