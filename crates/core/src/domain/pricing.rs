use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::engine::RateSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingConfigId(pub Uuid);

/// A named rate table. Several configurations may coexist (seasonal rates,
/// experiments); which one applies by default is decided by the resolution
/// policy in [`crate::pricing::resolution`], not by a storage constraint.
///
/// Quotes keep the total computed from the configuration that was current at
/// save time, so editing rates here never reprices historical quotes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfiguration {
    pub id: PricingConfigId,
    pub name: String,
    pub description: String,
    pub house_sqft_rate: Decimal,
    pub driveway_sqft_rate: Decimal,
    pub driveway_car_rate: Decimal,
    pub patio_deck_sqft_rate: Decimal,
    pub roof_sqft_rate: Decimal,
    pub gutter_flat_rate: Decimal,
    pub distance_per_km_rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingConfiguration {
    /// New configuration carrying the standard residential rates.
    pub fn with_default_rates(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PricingConfigId(Uuid::new_v4()),
            name: name.into(),
            description: String::new(),
            house_sqft_rate: Decimal::new(50, 2),
            driveway_sqft_rate: Decimal::new(70, 2),
            driveway_car_rate: Decimal::new(5000, 2),
            patio_deck_sqft_rate: Decimal::new(80, 2),
            roof_sqft_rate: Decimal::new(60, 2),
            gutter_flat_rate: Decimal::new(7500, 2),
            distance_per_km_rate: Decimal::new(200, 2),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read-only snapshot of the rates, as consumed by the pricing engine.
    pub fn rate_snapshot(&self) -> RateSnapshot {
        RateSnapshot {
            house_sqft_rate: Some(self.house_sqft_rate),
            driveway_sqft_rate: Some(self.driveway_sqft_rate),
            driveway_car_rate: Some(self.driveway_car_rate),
            patio_deck_sqft_rate: Some(self.patio_deck_sqft_rate),
            roof_sqft_rate: Some(self.roof_sqft_rate),
            gutter_flat_rate: Some(self.gutter_flat_rate),
            distance_per_km_rate: Some(self.distance_per_km_rate),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::PricingConfiguration;

    #[test]
    fn default_rates_match_the_standard_rate_card() {
        let config = PricingConfiguration::with_default_rates("standard");
        assert_eq!(config.house_sqft_rate, Decimal::new(50, 2));
        assert_eq!(config.driveway_sqft_rate, Decimal::new(70, 2));
        assert_eq!(config.driveway_car_rate, Decimal::new(5000, 2));
        assert_eq!(config.patio_deck_sqft_rate, Decimal::new(80, 2));
        assert_eq!(config.roof_sqft_rate, Decimal::new(60, 2));
        assert_eq!(config.gutter_flat_rate, Decimal::new(7500, 2));
        assert_eq!(config.distance_per_km_rate, Decimal::new(200, 2));
        assert!(config.is_active);
    }

    #[test]
    fn snapshot_carries_every_rate() {
        let config = PricingConfiguration::with_default_rates("standard");
        let snapshot = config.rate_snapshot();
        assert_eq!(snapshot.house_sqft_rate, Some(config.house_sqft_rate));
        assert_eq!(snapshot.gutter_flat_rate, Some(config.gutter_flat_rate));
        assert_eq!(snapshot.distance_per_km_rate, Some(config.distance_per_km_rate));
    }
}
