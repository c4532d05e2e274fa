use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use washdesk_core::config::{AppConfig, LoadOptions};
use washdesk_core::domain::quote::{DrivewayMode, ServiceSelections};
use washdesk_core::pricing::engine::compute_total;
use washdesk_db::{
    connect_with_settings, resolve_active_configuration, SqlPricingConfigRepository,
};

use crate::commands::CommandResult;

#[derive(Debug, Args)]
pub struct CalcArgs {
    #[arg(long, default_value_t = 0, help = "House area in square feet")]
    pub house_sqft: u32,
    #[arg(
        long,
        default_value = "sqft",
        help = "Driveway pricing mode: sqft (by area) or cars (by car count)"
    )]
    pub driveway_mode: String,
    #[arg(long, default_value_t = 0, help = "Driveway area in square feet")]
    pub driveway_sqft: u32,
    #[arg(long, default_value_t = 0, help = "Driveway size in cars (0-5)")]
    pub driveway_cars: u32,
    #[arg(long, default_value_t = 0, help = "Patio/deck area in square feet")]
    pub patio_deck_sqft: u32,
    #[arg(long, default_value_t = 0, help = "Roof area in square feet")]
    pub roof_sqft: u32,
    #[arg(long, help = "Include gutter cleaning (flat rate)")]
    pub gutter: bool,
    #[arg(long, default_value_t = 0, help = "Travel distance in kilometers")]
    pub distance_km: u32,
}

#[derive(Debug, Serialize)]
struct CalcPreview {
    configuration: String,
    driveway_mode: String,
    total: Decimal,
}

pub fn run(args: CalcArgs) -> CommandResult {
    let driveway_mode: DrivewayMode = match args.driveway_mode.parse() {
        Ok(mode) => mode,
        Err(error) => {
            return CommandResult::failure("calc", "invalid_selection", error.to_string(), 2);
        }
    };

    let selections = ServiceSelections {
        house_sqft: args.house_sqft,
        driveway_mode,
        driveway_sqft: args.driveway_sqft,
        driveway_cars: args.driveway_cars,
        patio_deck_sqft: args.patio_deck_sqft,
        roof_sqft: args.roof_sqft,
        gutter_cleaning: args.gutter,
        distance_km: args.distance_km,
    };
    if let Err(error) = selections.validate() {
        return CommandResult::failure("calc", "invalid_selection", error.to_string(), 2);
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "calc",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "calc",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let repo = SqlPricingConfigRepository::new(pool.clone());
        let resolved = resolve_active_configuration(&repo)
            .await
            .map_err(|error| ("resolution", error.to_string(), 4u8))?;
        pool.close().await;

        // An empty store is a caller-visible state, not a crash.
        resolved.ok_or_else(|| {
            (
                "no_pricing_configured",
                "no pricing configuration exists; create one before quoting".to_string(),
                6u8,
            )
        })
    });

    let configuration = match result {
        Ok(configuration) => configuration,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("calc", error_class, message, exit_code);
        }
    };

    match compute_total(&selections, &configuration.rate_snapshot()) {
        Ok(total) => {
            let preview = CalcPreview {
                configuration: configuration.name,
                driveway_mode: selections.driveway_mode.to_string(),
                total,
            };
            match serde_json::to_string(&preview) {
                Ok(json) => CommandResult::success("calc", json),
                Err(error) => {
                    CommandResult::failure("calc", "serialization", error.to_string(), 3)
                }
            }
        }
        Err(error) => {
            CommandResult::failure("calc", "invalid_configuration", error.to_string(), 5)
        }
    }
}
