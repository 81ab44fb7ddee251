use amplify_core::config::{AppConfig, LlmProvider, LoadOptions};
use amplify_db::connect_with_settings;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::commands::{block_on, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    checks: Vec<DoctorCheck>,
}

pub fn run() -> CommandResult {
    let report = build_report();
    let data = serde_json::to_value(&report).ok();

    if report.overall_status == CheckStatus::Pass {
        CommandResult::success_with_data("doctor", "all readiness checks passed", data)
    } else {
        CommandResult::failure_with_data(
            "doctor",
            "readiness",
            "one or more readiness checks failed",
            6,
            data,
        )
    }
}

fn build_report() -> DoctorReport {
    let checks = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            },
            check_email_key(&config),
            check_text_generation(&config),
            check_database_connectivity(&config),
        ],
        Err(error) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            },
            DoctorCheck::skipped("email_key_readiness"),
            DoctorCheck::skipped("text_generation"),
            DoctorCheck::skipped("database_connectivity"),
        ],
    };

    // Skipped checks are optional capabilities, only failures count.
    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_failed { CheckStatus::Fail } else { CheckStatus::Pass };

    DoctorReport { overall_status, checks }
}

fn check_email_key(config: &AppConfig) -> DoctorCheck {
    let present =
        config.email.api_key.as_ref().is_some_and(|key| !key.expose_secret().trim().is_empty());

    if present {
        DoctorCheck {
            name: "email_key_readiness",
            status: CheckStatus::Pass,
            details: format!("sending as `{}`", config.email.from_address),
        }
    } else {
        DoctorCheck {
            name: "email_key_readiness",
            status: CheckStatus::Fail,
            details: "email.api_key is not set; proposals cannot be sent".to_string(),
        }
    }
}

fn check_text_generation(config: &AppConfig) -> DoctorCheck {
    match config.llm.provider {
        LlmProvider::Disabled => DoctorCheck {
            name: "text_generation",
            status: CheckStatus::Skipped,
            details: "provider disabled; proposals use the fallback template".to_string(),
        },
        LlmProvider::OpenAi => DoctorCheck {
            name: "text_generation",
            status: CheckStatus::Pass,
            details: format!("model `{}` via {}", config.llm.model, config.llm.base_url),
        },
    }
}

fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    let outcome = block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

        pool.close().await;
        Ok::<(), String>(())
    });

    match outcome.and_then(|result| result) {
        Ok(()) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        },
        Err(error) => {
            DoctorCheck { name: "database_connectivity", status: CheckStatus::Fail, details: error }
        }
    }
}
