//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::models::{Category, MenuItem};
use crate::services::{DeliveryService, EmailService, Geocoder};

/// Catalog cache TTL. The menu changes rarely; a minute keeps the listing
/// endpoints off the database without making seed updates invisible.
const CATALOG_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    geocoder: Geocoder,
    delivery: DeliveryService,
    email: Option<EmailService>,
    menu_cache: Cache<(), Arc<Vec<MenuItem>>>,
    category_cache: Cache<(), Arc<Vec<Category>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay configuration is invalid.
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let geocoder = Geocoder::new(config.geocoder.clone());
        let delivery = DeliveryService::new(geocoder.clone(), config.restaurant.clone());
        let email = config.email.as_ref().map(EmailService::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                geocoder,
                delivery,
                email,
                menu_cache: Cache::builder().time_to_live(CATALOG_TTL).build(),
                category_cache: Cache::builder().time_to_live(CATALOG_TTL).build(),
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &Geocoder {
        &self.inner.geocoder
    }

    /// Get a reference to the delivery computation service.
    #[must_use]
    pub fn delivery(&self) -> &DeliveryService {
        &self.inner.delivery
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get the menu listing cache.
    #[must_use]
    pub fn menu_cache(&self) -> &Cache<(), Arc<Vec<MenuItem>>> {
        &self.inner.menu_cache
    }

    /// Get the category listing cache.
    #[must_use]
    pub fn category_cache(&self) -> &Cache<(), Arc<Vec<Category>>> {
        &self.inner.category_cache
    }
}
