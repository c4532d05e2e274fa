use washdesk_core::config::{AppConfig, LoadOptions};
use washdesk_db::{connect_with_settings, migrations};

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
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
                "migrate",
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
        let summary = migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        pool.close().await;
        Ok::<migrations::MigrationSummary, (&'static str, String, u8)>(summary)
    });

    match result {
        Ok(summary) if summary.schema_was_current() => CommandResult::success(
            "migrate",
            format!("schema already current ({} migrations on record)", summary.total),
        ),
        Ok(summary) => CommandResult::success(
            "migrate",
            format!(
                "applied {} of {} migrations: {}",
                summary.newly_applied.len(),
                summary.total,
                summary.newly_applied.join(", ")
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
