use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use washdesk_core::domain::customer::CustomerId;
use washdesk_core::domain::pricing::PricingConfigId;
use washdesk_core::domain::quote::{DrivewayMode, Quote, QuoteNumber, ServiceSelections};
use washdesk_core::errors::DomainError;
use washdesk_core::pricing::engine::RateSnapshot;

use super::pricing::{decode_decimal, decode_uuid};
use super::{QuoteRepository, RepositoryError};
use crate::DbPool;

const QUOTE_COLUMNS: &str = "quote_number, customer_id, pricing_id, quote_date, work_date, \
     is_completed, house_sqft, driveway_calculation_type, driveway_sqft, driveway_cars, \
     patio_deck_sqft, roof_sqft, gutter_cleaning, distance_km, total_amount, notes, \
     created_at, updated_at";

pub struct SqlQuoteRepository {
    pool: DbPool,
}

impl SqlQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Rates of the referenced configuration, read inside the save
    /// transaction so the computed total and the row write are atomic with
    /// respect to a concurrent configuration delete.
    async fn load_rates(
        conn: &mut SqliteConnection,
        pricing_id: &PricingConfigId,
    ) -> Result<RateSnapshot, RepositoryError> {
        let row = sqlx::query(
            "SELECT house_sqft_rate, driveway_sqft_rate, driveway_car_rate, \
                    patio_deck_sqft_rate, roof_sqft_rate, gutter_flat_rate, \
                    distance_per_km_rate \
             FROM pricing_configuration WHERE id = ?",
        )
        .bind(pricing_id.0.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        let row = row.ok_or_else(|| RepositoryError::MissingPricingConfiguration {
            id: pricing_id.clone(),
        })?;

        Ok(RateSnapshot {
            house_sqft_rate: Some(decode_decimal(&row, "house_sqft_rate")?),
            driveway_sqft_rate: Some(decode_decimal(&row, "driveway_sqft_rate")?),
            driveway_car_rate: Some(decode_decimal(&row, "driveway_car_rate")?),
            patio_deck_sqft_rate: Some(decode_decimal(&row, "patio_deck_sqft_rate")?),
            roof_sqft_rate: Some(decode_decimal(&row, "roof_sqft_rate")?),
            gutter_flat_rate: Some(decode_decimal(&row, "gutter_flat_rate")?),
            distance_per_km_rate: Some(decode_decimal(&row, "distance_per_km_rate")?),
        })
    }
}

fn decode_quantity(row: &SqliteRow, column: &str) -> Result<u32, RepositoryError> {
    let raw: i64 = row.try_get(column)?;
    u32::try_from(raw)
        .map_err(|_| RepositoryError::Decode(format!("column `{column}`: negative value {raw}")))
}

fn map_quote(row: &SqliteRow) -> Result<Quote, RepositoryError> {
    let mode_raw: String = row.try_get("driveway_calculation_type")?;
    let driveway_mode =
        DrivewayMode::from_str(&mode_raw).map_err(DomainError::from)?;

    let total_raw: Option<String> = row.try_get("total_amount")?;
    let total_amount = total_raw
        .map(|raw| {
            Decimal::from_str(&raw)
                .map_err(|error| RepositoryError::Decode(format!("column `total_amount`: {error}")))
        })
        .transpose()?;

    Ok(Quote {
        number: QuoteNumber(row.try_get("quote_number")?),
        customer_id: CustomerId(decode_uuid(row, "customer_id")?),
        pricing_id: PricingConfigId(decode_uuid(row, "pricing_id")?),
        quote_date: row.try_get::<NaiveDate, _>("quote_date")?,
        work_date: row.try_get::<Option<NaiveDate>, _>("work_date")?,
        is_completed: row.try_get("is_completed")?,
        selections: ServiceSelections {
            house_sqft: decode_quantity(row, "house_sqft")?,
            driveway_mode,
            driveway_sqft: decode_quantity(row, "driveway_sqft")?,
            driveway_cars: decode_quantity(row, "driveway_cars")?,
            patio_deck_sqft: decode_quantity(row, "patio_deck_sqft")?,
            roof_sqft: decode_quantity(row, "roof_sqft")?,
            gutter_cleaning: row.try_get("gutter_cleaning")?,
            distance_km: decode_quantity(row, "distance_km")?,
        },
        total_amount,
        notes: row.try_get("notes")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait::async_trait]
impl QuoteRepository for SqlQuoteRepository {
    async fn find_by_number(
        &self,
        number: &QuoteNumber,
    ) -> Result<Option<Quote>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {QUOTE_COLUMNS} FROM quote WHERE quote_number = ?"))
            .bind(&number.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_quote).transpose()
    }

    async fn list_for_customer(&self, id: &CustomerId) -> Result<Vec<Quote>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quote WHERE customer_id = ? ORDER BY quote_date DESC"
        ))
        .bind(id.0.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_quote).collect()
    }

    async fn save(&self, mut quote: Quote) -> Result<Quote, RepositoryError> {
        quote.selections.validate()?;

        let mut tx = self.pool.begin().await?;

        if !quote.has_total() {
            let rates = Self::load_rates(&mut *tx, &quote.pricing_id).await?;
            quote.ensure_total(&rates).map_err(DomainError::from)?;
            tracing::info!(
                event_name = "quote.total_computed",
                quote_number = %quote.number,
                pricing_id = %quote.pricing_id.0,
                "quote total fixed at first save"
            );
        }

        quote.updated_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO quote (
                quote_number, customer_id, pricing_id, quote_date, work_date,
                is_completed, house_sqft, driveway_calculation_type, driveway_sqft,
                driveway_cars, patio_deck_sqft, roof_sqft, gutter_cleaning,
                distance_km, total_amount, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(quote_number) DO UPDATE SET
                customer_id = excluded.customer_id,
                pricing_id = excluded.pricing_id,
                quote_date = excluded.quote_date,
                work_date = excluded.work_date,
                is_completed = excluded.is_completed,
                house_sqft = excluded.house_sqft,
                driveway_calculation_type = excluded.driveway_calculation_type,
                driveway_sqft = excluded.driveway_sqft,
                driveway_cars = excluded.driveway_cars,
                patio_deck_sqft = excluded.patio_deck_sqft,
                roof_sqft = excluded.roof_sqft,
                gutter_cleaning = excluded.gutter_cleaning,
                distance_km = excluded.distance_km,
                total_amount = excluded.total_amount,
                notes = excluded.notes,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&quote.number.0)
        .bind(quote.customer_id.0.to_string())
        .bind(quote.pricing_id.0.to_string())
        .bind(quote.quote_date)
        .bind(quote.work_date)
        .bind(quote.is_completed)
        .bind(i64::from(quote.selections.house_sqft))
        .bind(quote.selections.driveway_mode.as_db_value())
        .bind(i64::from(quote.selections.driveway_sqft))
        .bind(i64::from(quote.selections.driveway_cars))
        .bind(i64::from(quote.selections.patio_deck_sqft))
        .bind(i64::from(quote.selections.roof_sqft))
        .bind(quote.selections.gutter_cleaning)
        .bind(i64::from(quote.selections.distance_km))
        .bind(quote.total_amount.map(|total| total.to_string()))
        .bind(&quote.notes)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(quote)
    }

    async fn delete(&self, number: &QuoteNumber) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM quote WHERE quote_number = ?")
            .bind(&number.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
