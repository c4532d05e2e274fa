use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use washdesk_core::domain::pricing::{PricingConfigId, PricingConfiguration};

use super::{PricingConfigRepository, RepositoryError};
use crate::DbPool;

const CONFIG_COLUMNS: &str = "id, name, description, house_sqft_rate, driveway_sqft_rate, \
     driveway_car_rate, patio_deck_sqft_rate, roof_sqft_rate, gutter_flat_rate, \
     distance_per_km_rate, is_active, created_at, updated_at";

pub struct SqlPricingConfigRepository {
    pool: DbPool,
}

impl SqlPricingConfigRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn decode_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, RepositoryError> {
    let raw: String = row.try_get(column).map_err(RepositoryError::from)?;
    Decimal::from_str(&raw)
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn decode_uuid(row: &SqliteRow, column: &str) -> Result<Uuid, RepositoryError> {
    let raw: String = row.try_get(column).map_err(RepositoryError::from)?;
    Uuid::parse_str(&raw)
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn map_config(row: &SqliteRow) -> Result<PricingConfiguration, RepositoryError> {
    Ok(PricingConfiguration {
        id: PricingConfigId(decode_uuid(row, "id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        house_sqft_rate: decode_decimal(row, "house_sqft_rate")?,
        driveway_sqft_rate: decode_decimal(row, "driveway_sqft_rate")?,
        driveway_car_rate: decode_decimal(row, "driveway_car_rate")?,
        patio_deck_sqft_rate: decode_decimal(row, "patio_deck_sqft_rate")?,
        roof_sqft_rate: decode_decimal(row, "roof_sqft_rate")?,
        gutter_flat_rate: decode_decimal(row, "gutter_flat_rate")?,
        distance_per_km_rate: decode_decimal(row, "distance_per_km_rate")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait::async_trait]
impl PricingConfigRepository for SqlPricingConfigRepository {
    async fn find_by_id(
        &self,
        id: &PricingConfigId,
    ) -> Result<Option<PricingConfiguration>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CONFIG_COLUMNS} FROM pricing_configuration WHERE id = ?"
        ))
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_config).transpose()
    }

    async fn find_active(&self) -> Result<Vec<PricingConfiguration>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONFIG_COLUMNS} FROM pricing_configuration \
             WHERE is_active = 1 ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_config).collect()
    }

    async fn find_most_recently_updated(
        &self,
    ) -> Result<Option<PricingConfiguration>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CONFIG_COLUMNS} FROM pricing_configuration \
             ORDER BY updated_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_config).transpose()
    }

    async fn list(&self) -> Result<Vec<PricingConfiguration>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONFIG_COLUMNS} FROM pricing_configuration ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_config).collect()
    }

    async fn save(&self, mut config: PricingConfiguration) -> Result<(), RepositoryError> {
        config.touch();

        sqlx::query(
            r#"
            INSERT INTO pricing_configuration (
                id, name, description, house_sqft_rate, driveway_sqft_rate,
                driveway_car_rate, patio_deck_sqft_rate, roof_sqft_rate,
                gutter_flat_rate, distance_per_km_rate, is_active, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                house_sqft_rate = excluded.house_sqft_rate,
                driveway_sqft_rate = excluded.driveway_sqft_rate,
                driveway_car_rate = excluded.driveway_car_rate,
                patio_deck_sqft_rate = excluded.patio_deck_sqft_rate,
                roof_sqft_rate = excluded.roof_sqft_rate,
                gutter_flat_rate = excluded.gutter_flat_rate,
                distance_per_km_rate = excluded.distance_per_km_rate,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(config.id.0.to_string())
        .bind(&config.name)
        .bind(&config.description)
        .bind(config.house_sqft_rate.to_string())
        .bind(config.driveway_sqft_rate.to_string())
        .bind(config.driveway_car_rate.to_string())
        .bind(config.patio_deck_sqft_rate.to_string())
        .bind(config.roof_sqft_rate.to_string())
        .bind(config.gutter_flat_rate.to_string())
        .bind(config.distance_per_km_rate.to_string())
        .bind(config.is_active)
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &PricingConfigId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pricing_configuration WHERE id = ?")
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(db_error) = &error {
                    if db_error.is_foreign_key_violation() {
                        tracing::warn!(
                            event_name = "pricing_config.delete_rejected",
                            config_id = %id.0,
                            "delete rejected: configuration still referenced by quotes"
                        );
                        return Err(RepositoryError::ConfigurationInUse { id: id.clone() });
                    }
                }
                Err(RepositoryError::Database(error))
            }
        }
    }
}
