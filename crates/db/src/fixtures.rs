use sqlx::{Executor, Row};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_QUOTE_NUMBERS: &[&str] = &["Q-1001", "Q-1002", "Q-1003"];
const SEED_CONFIG_NAME: &str = "standard";

/// Deterministic demo dataset: one standard rate card, two customers, three
/// quotes covering area-mode, car-mode, and gutter-only pricing. Totals are
/// pre-computed in the fixture so seeded quotes behave like historical
/// records with fixed amounts.
pub struct DemoSeedDataset;

#[derive(Debug)]
pub struct SeedResult {
    pub quote_numbers: Vec<&'static str>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl DemoSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_seed_data.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult { quote_numbers: SEED_QUOTE_NUMBERS.to_vec() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let config_count: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM pricing_configuration WHERE name = ? AND is_active = 1",
        )
        .bind(SEED_CONFIG_NAME)
        .fetch_one(pool)
        .await?
        .get("count");
        checks.push(("active_standard_configuration", config_count == 1));

        let customer_count: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM customer")
                .fetch_one(pool)
                .await?
                .get("count");
        checks.push(("customers_present", customer_count >= 2));

        let quote_count: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM quote WHERE quote_number IN ('Q-1001', 'Q-1002', 'Q-1003')",
        )
        .fetch_one(pool)
        .await?
        .get("count");
        checks.push(("seed_quotes_present", quote_count == 3));

        let unpriced_count: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM quote WHERE total_amount IS NULL OR total_amount = ''",
        )
        .fetch_one(pool)
        .await?
        .get("count");
        checks.push(("all_quotes_priced", unpriced_count == 0));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}
