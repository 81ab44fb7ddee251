use std::env;
use std::fs;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use amplify_cli::commands::{config, doctor, migrate, price};
use rust_decimal::Decimal;
use serde_json::Value;

const BASE_ENV: &[(&str, &str)] =
    &[("AMPLIFY_PORTAL_PASSWORD", "letmein"), ("AMPLIFY_DATABASE_URL", "sqlite::memory:")];

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(BASE_ENV, || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_without_portal_password() {
    with_env(&[("AMPLIFY_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"].as_str().unwrap_or("").contains("portal.password"));
    });
}

#[test]
fn config_redacts_secrets_and_attributes_env_sources() {
    with_env(
        &[
            ("AMPLIFY_PORTAL_PASSWORD", "letmein"),
            ("AMPLIFY_EMAIL_API_KEY", "re_secret_value"),
            ("AMPLIFY_LOG_LEVEL", "debug"),
        ],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            let data = &payload["data"];
            assert_eq!(data["effective"]["portal"]["password"], "[redacted]");
            assert_eq!(data["effective"]["email"]["api_key"], "[redacted]");
            assert_eq!(data["effective"]["llm"]["api_key"], "[unset]");
            assert_eq!(data["effective"]["logging"]["level"], "debug");
            assert_eq!(data["sources"]["email.api_key"], "env (AMPLIFY_EMAIL_API_KEY)");
            assert_eq!(data["sources"]["logging.level"], "env (AMPLIFY_LOG_LEVEL)");
            assert_eq!(data["sources"]["server.port"], "default");
            assert!(!result.output.contains("re_secret_value"));
            assert!(!result.output.contains("letmein"));
        },
    );
}

#[test]
fn doctor_fails_readiness_without_email_key() {
    with_env(BASE_ENV, || {
        let result = doctor::run();
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "readiness");
        let checks = payload["data"]["checks"].as_array().expect("checks array");
        assert_eq!(check_status(checks, "config_validation"), "pass");
        assert_eq!(check_status(checks, "email_key_readiness"), "fail");
        assert_eq!(check_status(checks, "text_generation"), "skipped");
        assert_eq!(check_status(checks, "database_connectivity"), "pass");
    });
}

#[test]
fn doctor_passes_with_email_key_and_disabled_generator() {
    with_env(
        &[
            ("AMPLIFY_PORTAL_PASSWORD", "letmein"),
            ("AMPLIFY_DATABASE_URL", "sqlite::memory:"),
            ("AMPLIFY_EMAIL_API_KEY", "re_test"),
        ],
        || {
            let result = doctor::run();
            assert_eq!(result.exit_code, 0, "output: {}", result.output);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["status"], "ok");
            assert_eq!(payload["data"]["overall_status"], "pass");
        },
    );
}

#[test]
fn doctor_skips_dependent_checks_when_config_fails() {
    with_env(&[], || {
        let result = doctor::run();
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        let checks = payload["data"]["checks"].as_array().expect("checks array");
        assert_eq!(check_status(checks, "config_validation"), "fail");
        assert_eq!(check_status(checks, "database_connectivity"), "skipped");
    });
}

#[test]
fn price_reads_toml_campaign_and_reports_commission() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("campaign.toml");
    fs::write(
        &path,
        r#"
[playlist_placement]
enabled = true
package = "20000"
discount = 10

[social_seeding]
enabled = true
budget = 500
"#,
    )
    .expect("write campaign");

    let result = price::run(&path);
    assert_eq!(result.exit_code, 0, "output: {}", result.output);

    let payload = parse_payload(&result.output);
    let data = &payload["data"];
    assert_eq!(data["has_active_service"], true);
    assert_eq!(data["breakdown"]["line_items"].as_array().map(Vec::len), Some(2));
    assert_eq!(decimal(&data["breakdown"]["grand_total"]), Decimal::from(824));
    assert_eq!(decimal(&data["commission"]["total"]), Decimal::from_str("94.8").expect("dec"));
}

#[test]
fn price_clamps_json_discount_above_ceiling() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("campaign.json");
    fs::write(
        &path,
        r#"{"playlist_placement": {"enabled": true, "package": "20000", "discount": "90"}}"#,
    )
    .expect("write campaign");

    let result = price::run(&path);
    assert_eq!(result.exit_code, 0, "output: {}", result.output);

    let payload = parse_payload(&result.output);
    let line = &payload["data"]["breakdown"]["line_items"][0];
    assert_eq!(decimal(&line["discount_percent"]), Decimal::from(20));
    assert_eq!(decimal(&line["discounted_price"]), Decimal::from(288));
}

#[test]
fn price_reports_inactive_campaign_without_failing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").expect("write campaign");

    let result = price::run(&path);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["has_active_service"], false);
    assert_eq!(decimal(&payload["data"]["breakdown"]["grand_total"]), Decimal::ZERO);
}

#[test]
fn price_classifies_missing_and_malformed_files() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = price::run(&dir.path().join("absent.toml"));
    assert_eq!(missing.exit_code, 2);
    assert_eq!(parse_payload(&missing.output)["error_class"], "input_read");

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write campaign");
    let malformed = price::run(&path);
    assert_eq!(malformed.exit_code, 3);
    assert_eq!(parse_payload(&malformed.output)["error_class"], "input_parse");
}

fn check_status<'a>(checks: &'a [Value], name: &str) -> &'a str {
    checks
        .iter()
        .find(|check| check["name"] == name)
        .and_then(|check| check["status"].as_str())
        .unwrap_or("missing")
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(raw) => Decimal::from_str(raw).expect("decimal string"),
        other => Decimal::from_str(&other.to_string()).expect("decimal number"),
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "AMPLIFY_DATABASE_URL",
        "AMPLIFY_DATABASE_MAX_CONNECTIONS",
        "AMPLIFY_DATABASE_TIMEOUT_SECS",
        "AMPLIFY_PORTAL_PASSWORD",
        "AMPLIFY_LLM_PROVIDER",
        "AMPLIFY_LLM_API_KEY",
        "AMPLIFY_LLM_BASE_URL",
        "AMPLIFY_LLM_MODEL",
        "AMPLIFY_LLM_TEMPERATURE",
        "AMPLIFY_LLM_MAX_TOKENS",
        "AMPLIFY_LLM_TIMEOUT_SECS",
        "AMPLIFY_EMAIL_API_KEY",
        "AMPLIFY_EMAIL_BASE_URL",
        "AMPLIFY_EMAIL_FROM_ADDRESS",
        "AMPLIFY_EMAIL_TIMEOUT_SECS",
        "AMPLIFY_PROPOSAL_COMPANY_NAME",
        "AMPLIFY_PROPOSAL_LEGAL_NAME",
        "AMPLIFY_PROPOSAL_COMPANY_URL",
        "AMPLIFY_PROPOSAL_VALIDITY_DAYS",
        "AMPLIFY_SERVER_BIND_ADDRESS",
        "AMPLIFY_SERVER_PORT",
        "AMPLIFY_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "AMPLIFY_LOGGING_LEVEL",
        "AMPLIFY_LOGGING_FORMAT",
        "AMPLIFY_LOG_LEVEL",
        "AMPLIFY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
