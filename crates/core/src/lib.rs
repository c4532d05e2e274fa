pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use domain::customer::{Customer, CustomerId};
pub use domain::pricing::{PricingConfigId, PricingConfiguration};
pub use domain::quote::{DrivewayMode, Quote, QuoteNumber, ServiceSelections};
pub use errors::{ApplicationError, DomainError};
pub use pricing::engine::{compute_total, PricingError, RateSnapshot};
pub use pricing::resolution::select_configuration;
