use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::quote::{DrivewayMode, ServiceSelections};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("pricing snapshot is missing required rate `{field}`")]
    InvalidConfiguration { field: &'static str },
    #[error("unrecognized driveway calculation type `{value}`")]
    InvalidSelection { value: String },
}

/// Read-only view of a rate table as the engine consumes it.
///
/// Fields are optional because snapshots can arrive from serialized
/// calculator payloads where a rate was never filled in; a missing rate is a
/// caller bug surfaced as [`PricingError::InvalidConfiguration`], never
/// silently defaulted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(default)]
    pub house_sqft_rate: Option<Decimal>,
    #[serde(default)]
    pub driveway_sqft_rate: Option<Decimal>,
    #[serde(default)]
    pub driveway_car_rate: Option<Decimal>,
    #[serde(default)]
    pub patio_deck_sqft_rate: Option<Decimal>,
    #[serde(default)]
    pub roof_sqft_rate: Option<Decimal>,
    #[serde(default)]
    pub gutter_flat_rate: Option<Decimal>,
    #[serde(default)]
    pub distance_per_km_rate: Option<Decimal>,
}

fn require(rate: Option<Decimal>, field: &'static str) -> Result<Decimal, PricingError> {
    rate.ok_or(PricingError::InvalidConfiguration { field })
}

/// Additive line-item total for a set of service selections.
///
/// Pure and deterministic: identical inputs always produce the identical
/// amount, which is what makes historical quotes auditable. All arithmetic is
/// exact fixed-point decimal; the result is rounded to 2 fractional digits.
/// Exactly one driveway term applies, selected by
/// [`ServiceSelections::driveway_mode`]. Assumes pre-validated quantities;
/// range checks live at the persistence boundary.
pub fn compute_total(
    selections: &ServiceSelections,
    rates: &RateSnapshot,
) -> Result<Decimal, PricingError> {
    let mut total = Decimal::ZERO;

    total += Decimal::from(selections.house_sqft)
        * require(rates.house_sqft_rate, "house_sqft_rate")?;

    total += match selections.driveway_mode {
        DrivewayMode::ByArea => {
            Decimal::from(selections.driveway_sqft)
                * require(rates.driveway_sqft_rate, "driveway_sqft_rate")?
        }
        DrivewayMode::ByCarCount => {
            Decimal::from(selections.driveway_cars)
                * require(rates.driveway_car_rate, "driveway_car_rate")?
        }
    };

    total += Decimal::from(selections.patio_deck_sqft)
        * require(rates.patio_deck_sqft_rate, "patio_deck_sqft_rate")?;

    total += Decimal::from(selections.roof_sqft)
        * require(rates.roof_sqft_rate, "roof_sqft_rate")?;

    if selections.gutter_cleaning {
        total += require(rates.gutter_flat_rate, "gutter_flat_rate")?;
    }

    total += Decimal::from(selections.distance_km)
        * require(rates.distance_per_km_rate, "distance_per_km_rate")?;

    Ok(total.round_dp(2))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::quote::{DrivewayMode, ServiceSelections};

    use super::{compute_total, PricingError, RateSnapshot};

    fn standard_rates() -> RateSnapshot {
        RateSnapshot {
            house_sqft_rate: Some(Decimal::new(50, 2)),
            driveway_sqft_rate: Some(Decimal::new(70, 2)),
            driveway_car_rate: Some(Decimal::new(5000, 2)),
            patio_deck_sqft_rate: Some(Decimal::new(80, 2)),
            roof_sqft_rate: Some(Decimal::new(60, 2)),
            gutter_flat_rate: Some(Decimal::new(7500, 2)),
            distance_per_km_rate: Some(Decimal::new(200, 2)),
        }
    }

    fn full_selections(mode: DrivewayMode) -> ServiceSelections {
        ServiceSelections {
            house_sqft: 1000,
            driveway_mode: mode,
            driveway_sqft: 400,
            driveway_cars: 2,
            patio_deck_sqft: 200,
            roof_sqft: 500,
            gutter_cleaning: true,
            distance_km: 10,
        }
    }

    #[test]
    fn zero_selections_price_to_zero() {
        let total = compute_total(&ServiceSelections::default(), &standard_rates())
            .expect("zero selections are valid");
        assert_eq!(total, Decimal::new(0, 2));
    }

    #[test]
    fn gutter_only_prices_to_the_flat_rate() {
        let selections =
            ServiceSelections { gutter_cleaning: true, ..ServiceSelections::default() };
        let total = compute_total(&selections, &standard_rates()).expect("gutter only");
        assert_eq!(total, Decimal::new(7500, 2));
    }

    #[test]
    fn area_mode_composes_all_line_items() {
        // 1000*0.50 + 400*0.70 + 200*0.80 + 500*0.60 + 75.00 + 10*2.00
        let total = compute_total(&full_selections(DrivewayMode::ByArea), &standard_rates())
            .expect("area mode");
        assert_eq!(total, Decimal::new(133500, 2));
    }

    #[test]
    fn car_mode_swaps_only_the_driveway_term() {
        // driveway term becomes 2*50.00; driveway_sqft stays populated but is ignored
        let total = compute_total(&full_selections(DrivewayMode::ByCarCount), &standard_rates())
            .expect("car mode");
        assert_eq!(total, Decimal::new(115500, 2));
    }

    #[test]
    fn driveway_terms_are_mutually_exclusive() {
        let area = compute_total(&full_selections(DrivewayMode::ByArea), &standard_rates())
            .expect("area mode");
        let cars = compute_total(&full_selections(DrivewayMode::ByCarCount), &standard_rates())
            .expect("car mode");
        assert_eq!(area - cars, Decimal::new(28000, 2) - Decimal::new(10000, 2));
    }

    #[test]
    fn repeated_invocation_is_deterministic() {
        let selections = full_selections(DrivewayMode::ByArea);
        let rates = standard_rates();
        let first = compute_total(&selections, &rates).expect("first");
        for _ in 0..16 {
            assert_eq!(compute_total(&selections, &rates).expect("repeat"), first);
        }
    }

    #[test]
    fn missing_rate_is_an_invalid_configuration() {
        let rates = RateSnapshot { gutter_flat_rate: None, ..standard_rates() };
        let selections =
            ServiceSelections { gutter_cleaning: true, ..ServiceSelections::default() };
        let error = compute_total(&selections, &rates).expect_err("missing gutter rate");
        assert_eq!(error, PricingError::InvalidConfiguration { field: "gutter_flat_rate" });
    }

    #[test]
    fn unused_driveway_rate_may_be_absent() {
        // Car mode never reads the per-sqft driveway rate.
        let rates = RateSnapshot { driveway_sqft_rate: None, ..standard_rates() };
        let total = compute_total(&full_selections(DrivewayMode::ByCarCount), &rates)
            .expect("car mode without sqft rate");
        assert_eq!(total, Decimal::new(115500, 2));
    }

    #[test]
    fn partial_snapshot_deserializes_with_missing_fields_as_none() {
        let snapshot: RateSnapshot =
            serde_json::from_str(r#"{"house_sqft_rate":"0.50"}"#).expect("partial json");
        assert_eq!(snapshot.house_sqft_rate, Some(Decimal::new(50, 2)));
        assert_eq!(snapshot.roof_sqft_rate, None);
    }
}
