use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::domain::pricing::PricingConfigId;
use crate::errors::DomainError;
use crate::pricing::engine::{compute_total, PricingError, RateSnapshot};

/// Human-assigned quote identifier, unique across the business.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteNumber(pub String);

impl fmt::Display for QuoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const MAX_DRIVEWAY_CARS: u32 = 5;

/// How the driveway line item is priced. The two modes are mutually
/// exclusive: only the term selected here enters the total, even when both
/// quantity fields are populated from an earlier mode switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivewayMode {
    #[default]
    ByArea,
    ByCarCount,
}

impl DrivewayMode {
    /// Stored column value, kept compatible with the historical `sqft` /
    /// `cars` records.
    pub fn as_db_value(self) -> &'static str {
        match self {
            Self::ByArea => "sqft",
            Self::ByCarCount => "cars",
        }
    }
}

impl FromStr for DrivewayMode {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqft" | "by_area" => Ok(Self::ByArea),
            "cars" | "by_car_count" => Ok(Self::ByCarCount),
            _ => Err(PricingError::InvalidSelection { value: value.to_string() }),
        }
    }
}

impl fmt::Display for DrivewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_value())
    }
}

/// The service-quantity and option fields that drive price computation.
/// Quantities are unsigned so negative inputs are unrepresentable; the car
/// count upper bound is checked by [`ServiceSelections::validate`] at the
/// persistence boundary, never clamped by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSelections {
    pub house_sqft: u32,
    pub driveway_mode: DrivewayMode,
    pub driveway_sqft: u32,
    pub driveway_cars: u32,
    pub patio_deck_sqft: u32,
    pub roof_sqft: u32,
    pub gutter_cleaning: bool,
    pub distance_km: u32,
}

impl ServiceSelections {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.driveway_cars > MAX_DRIVEWAY_CARS {
            return Err(DomainError::CarCountOutOfRange { cars: self.driveway_cars });
        }
        Ok(())
    }
}

/// A priced record of requested services for one customer.
///
/// `total_amount` is fixed the first time it is computed; later edits to the
/// referenced configuration never reprice it. [`Quote::reset_total`] is the
/// only way to request a recompute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub number: QuoteNumber,
    pub customer_id: CustomerId,
    pub pricing_id: PricingConfigId,
    pub quote_date: NaiveDate,
    pub work_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub selections: ServiceSelections,
    pub total_amount: Option<Decimal>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        number: QuoteNumber,
        customer_id: CustomerId,
        pricing_id: PricingConfigId,
        selections: ServiceSelections,
    ) -> Self {
        let now = Utc::now();
        Self {
            number,
            customer_id,
            pricing_id,
            quote_date: now.date_naive(),
            work_date: None,
            is_completed: false,
            selections,
            total_amount: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A zero total counts as "not yet computed"; the engine returns zero for
    /// all-empty selections and such quotes stay eligible for recomputation.
    pub fn has_total(&self) -> bool {
        matches!(self.total_amount, Some(total) if !total.is_zero())
    }

    /// Compute-if-absent guard body. Returns whether a total was computed on
    /// this call; a quote with an established total is left untouched.
    pub fn ensure_total(&mut self, rates: &RateSnapshot) -> Result<bool, PricingError> {
        if self.has_total() {
            return Ok(false);
        }
        self.total_amount = Some(compute_total(&self.selections, rates)?);
        Ok(true)
    }

    /// Explicitly discard the stored total so the next save reprices the
    /// quote against the current configuration.
    pub fn reset_total(&mut self) {
        self.total_amount = None;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::customer::CustomerId;
    use crate::domain::pricing::{PricingConfigId, PricingConfiguration};
    use crate::errors::DomainError;
    use crate::pricing::engine::PricingError;

    use super::{DrivewayMode, Quote, QuoteNumber, ServiceSelections};

    fn quote(selections: ServiceSelections) -> Quote {
        Quote::new(
            QuoteNumber("Q-1001".to_string()),
            CustomerId(Uuid::new_v4()),
            PricingConfigId(Uuid::new_v4()),
            selections,
        )
    }

    #[test]
    fn driveway_mode_parses_stored_and_spelled_out_values() {
        assert_eq!("sqft".parse::<DrivewayMode>().unwrap(), DrivewayMode::ByArea);
        assert_eq!("cars".parse::<DrivewayMode>().unwrap(), DrivewayMode::ByCarCount);
        assert_eq!("by_area".parse::<DrivewayMode>().unwrap(), DrivewayMode::ByArea);
        assert_eq!("by_car_count".parse::<DrivewayMode>().unwrap(), DrivewayMode::ByCarCount);
    }

    #[test]
    fn unrecognized_driveway_mode_is_an_invalid_selection() {
        let error = "trucks".parse::<DrivewayMode>().expect_err("should reject");
        assert!(matches!(error, PricingError::InvalidSelection { ref value } if value == "trucks"));
    }

    #[test]
    fn car_count_above_five_fails_validation() {
        let selections = ServiceSelections { driveway_cars: 6, ..ServiceSelections::default() };
        let error = selections.validate().expect_err("should reject");
        assert_eq!(error, DomainError::CarCountOutOfRange { cars: 6 });
    }

    #[test]
    fn car_count_at_the_bound_passes_validation() {
        let selections = ServiceSelections { driveway_cars: 5, ..ServiceSelections::default() };
        assert!(selections.validate().is_ok());
    }

    #[test]
    fn ensure_total_computes_once_then_holds() {
        let config = PricingConfiguration::with_default_rates("standard");
        let mut quote = quote(ServiceSelections {
            house_sqft: 1000,
            ..ServiceSelections::default()
        });

        let computed = quote.ensure_total(&config.rate_snapshot()).expect("first save");
        assert!(computed);
        assert_eq!(quote.total_amount, Some(Decimal::new(50000, 2)));

        quote.selections.house_sqft = 2000;
        let recomputed = quote.ensure_total(&config.rate_snapshot()).expect("second save");
        assert!(!recomputed);
        assert_eq!(quote.total_amount, Some(Decimal::new(50000, 2)));
    }

    #[test]
    fn reset_total_reopens_the_quote_for_pricing() {
        let config = PricingConfiguration::with_default_rates("standard");
        let mut quote = quote(ServiceSelections {
            house_sqft: 1000,
            ..ServiceSelections::default()
        });
        quote.ensure_total(&config.rate_snapshot()).expect("first save");

        quote.selections.house_sqft = 2000;
        quote.reset_total();
        quote.ensure_total(&config.rate_snapshot()).expect("after reset");
        assert_eq!(quote.total_amount, Some(Decimal::new(100000, 2)));
    }

    #[test]
    fn preset_total_survives_ensure_total() {
        let config = PricingConfiguration::with_default_rates("standard");
        let mut quote = quote(ServiceSelections {
            house_sqft: 1000,
            ..ServiceSelections::default()
        });
        quote.total_amount = Some(Decimal::new(4200, 2));

        let computed = quote.ensure_total(&config.rate_snapshot()).expect("save");
        assert!(!computed);
        assert_eq!(quote.total_amount, Some(Decimal::new(4200, 2)));
    }
}
