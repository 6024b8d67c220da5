//! Services module
//!
//! This module contains the clients for the remote store and wires them
//! into the flow engines

pub mod catalog;
pub mod interactions;

// Re-export commonly used services
pub use catalog::CatalogService;
pub use interactions::InteractionService;

use crate::config::settings::Settings;
use crate::state::{BrowseFlow, QuizFlow, SessionStore};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub catalog_service: CatalogService,
    pub interaction_service: InteractionService,
    pub browse_flow: BrowseFlow,
    pub quiz_flow: QuizFlow,
    pub settings: Settings,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, store: SessionStore) -> Result<Self> {
        let client = catalog::build_store_client(&settings.catalog)?;
        let base_url = catalog::rest_root(&settings.catalog);

        let catalog_service = CatalogService::new(client.clone(), base_url.clone());
        let interaction_service = InteractionService::new(client, base_url);
        let browse_flow = BrowseFlow::new(catalog_service.clone(), interaction_service.clone(), store.clone());
        let quiz_flow = QuizFlow::new(catalog_service.clone(), interaction_service.clone(), store);

        Ok(Self {
            catalog_service,
            interaction_service,
            browse_flow,
            quiz_flow,
            settings,
        })
    }
}
