//! Business logic services

pub mod catalog;
pub mod seed;

use std::sync::Arc;

use crate::repository::BookStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store),
        }
    }
}
