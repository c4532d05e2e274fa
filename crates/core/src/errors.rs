use thiserror::Error;

use crate::pricing::engine::PricingError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("driveway car count {cars} exceeds the maximum of 5")]
    CarCountOutOfRange { cars: u32 },
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Whether the caller can fix the condition by correcting their input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError};
    use crate::pricing::engine::PricingError;

    #[test]
    fn domain_errors_are_user_correctable() {
        let error = ApplicationError::from(DomainError::CarCountOutOfRange { cars: 9 });
        assert!(error.is_user_correctable());
        assert!(error.to_string().contains("car count 9"));
    }

    #[test]
    fn pricing_errors_flow_through_the_domain_layer() {
        let error = ApplicationError::from(DomainError::from(
            PricingError::InvalidConfiguration { field: "gutter_flat_rate" },
        ));
        assert!(error.is_user_correctable());
        assert!(error.to_string().contains("gutter_flat_rate"));
    }

    #[test]
    fn persistence_errors_are_not_user_correctable() {
        let error = ApplicationError::Persistence("database lock timeout".to_owned());
        assert!(!error.is_user_correctable());
    }
}
