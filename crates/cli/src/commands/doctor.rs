use serde::Serialize;

use washdesk_core::config::{AppConfig, LoadOptions};
use washdesk_db::{connect_with_settings, ping};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    command: &'static str,
    healthy: bool,
    checks: Vec<DoctorCheck>,
}

pub fn run(json: bool) -> CommandResult {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                passed: true,
                detail: format!("database url `{}`", config.database.url),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                passed: false,
                detail: error.to_string(),
            });
            None
        }
    };

    if let Some(config) = config {
        let connectivity = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| error.to_string())
            .and_then(|runtime| {
                runtime.block_on(async {
                    let pool = connect_with_settings(
                        &config.database.url,
                        config.database.max_connections,
                        config.database.timeout_secs,
                    )
                    .await
                    .map_err(|error| error.to_string())?;
                    ping(&pool).await.map_err(|error| error.to_string())?;
                    pool.close().await;
                    Ok(())
                })
            });

        checks.push(match connectivity {
            Ok(()) => DoctorCheck {
                name: "db_connectivity",
                passed: true,
                detail: "connected and answered a probe query".to_string(),
            },
            Err(detail) => DoctorCheck { name: "db_connectivity", passed: false, detail },
        });
    }

    let healthy = checks.iter().all(|check| check.passed);
    let report = DoctorReport { command: "doctor", healthy, checks };

    let output = if json {
        serde_json::to_string(&report).unwrap_or_else(|error| error.to_string())
    } else {
        let mut lines = vec![format!(
            "doctor: {}",
            if report.healthy { "healthy" } else { "unhealthy" }
        )];
        for check in &report.checks {
            lines.push(format!(
                "  [{}] {} - {}",
                if check.passed { "ok" } else { "fail" },
                check.name,
                check.detail
            ));
        }
        lines.join("\n")
    };

    CommandResult { exit_code: if healthy { 0 } else { 4 }, output }
}
