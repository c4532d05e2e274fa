pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, ping, DbPool};
pub use fixtures::{DemoSeedDataset, SeedResult, VerificationResult};
pub use repositories::{
    resolve_active_configuration, CustomerRepository, InMemoryAdminStore,
    PricingConfigRepository, QuoteRepository, RepositoryError, SqlCustomerRepository,
    SqlPricingConfigRepository, SqlQuoteRepository,
};
