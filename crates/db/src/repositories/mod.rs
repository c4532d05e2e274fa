use async_trait::async_trait;
use thiserror::Error;

use washdesk_core::domain::customer::{Customer, CustomerId};
use washdesk_core::domain::pricing::{PricingConfigId, PricingConfiguration};
use washdesk_core::domain::quote::{Quote, QuoteNumber};
use washdesk_core::errors::DomainError;

pub mod customer;
pub mod memory;
pub mod pricing;
pub mod quote;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryAdminStore;
pub use pricing::SqlPricingConfigRepository;
pub use quote::SqlQuoteRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("pricing configuration {} is referenced by existing quotes and cannot be deleted", .id.0)]
    ConfigurationInUse { id: PricingConfigId },
    #[error("quote references pricing configuration {} which does not exist", .id.0)]
    MissingPricingConfiguration { id: PricingConfigId },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[async_trait]
pub trait PricingConfigRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: &PricingConfigId,
    ) -> Result<Option<PricingConfiguration>, RepositoryError>;

    /// Active configurations ordered most-recently-updated first.
    async fn find_active(&self) -> Result<Vec<PricingConfiguration>, RepositoryError>;

    async fn find_most_recently_updated(
        &self,
    ) -> Result<Option<PricingConfiguration>, RepositoryError>;

    async fn list(&self) -> Result<Vec<PricingConfiguration>, RepositoryError>;

    /// Upsert. `updated_at` is bumped on every write.
    async fn save(&self, config: PricingConfiguration) -> Result<(), RepositoryError>;

    /// Protect-on-delete: fails with [`RepositoryError::ConfigurationInUse`]
    /// while any quote references the configuration.
    async fn delete(&self, id: &PricingConfigId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;
    async fn save(&self, customer: Customer) -> Result<(), RepositoryError>;
    /// Deletes the customer and, by cascade, all of their quotes.
    async fn delete(&self, id: &CustomerId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_by_number(&self, number: &QuoteNumber)
        -> Result<Option<Quote>, RepositoryError>;

    async fn list_for_customer(&self, id: &CustomerId) -> Result<Vec<Quote>, RepositoryError>;

    /// Persist a quote, running the compute-if-absent total guard first.
    /// Returns the persisted quote, total included. The guard runs on every
    /// save, not only creation; a quote with an established total is written
    /// unchanged.
    async fn save(&self, quote: Quote) -> Result<Quote, RepositoryError>;

    async fn delete(&self, number: &QuoteNumber) -> Result<(), RepositoryError>;
}

/// Default-configuration resolution over any pricing repository: first the
/// most recently updated active configuration, then the most recently
/// updated overall. `Ok(None)` means nothing is configured yet; callers
/// surface that state rather than treating it as a failure.
pub async fn resolve_active_configuration(
    repo: &dyn PricingConfigRepository,
) -> Result<Option<PricingConfiguration>, RepositoryError> {
    if let Some(active) = repo.find_active().await?.into_iter().next() {
        return Ok(Some(active));
    }
    repo.find_most_recently_updated().await
}
