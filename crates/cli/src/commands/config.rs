use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use amplify_core::config::{AppConfig, LoadOptions};
use serde_json::{Map, Value as JsonValue};
use toml::Value;

use crate::commands::CommandResult;

/// Config keys paired with the environment variables that can set them, in
/// the order the config loader consults them.
const ATTRIBUTED_KEYS: &[(&str, &[&str])] = &[
    ("database.url", &["AMPLIFY_DATABASE_URL"]),
    ("database.max_connections", &["AMPLIFY_DATABASE_MAX_CONNECTIONS"]),
    ("database.timeout_secs", &["AMPLIFY_DATABASE_TIMEOUT_SECS"]),
    ("portal.password", &["AMPLIFY_PORTAL_PASSWORD"]),
    ("llm.provider", &["AMPLIFY_LLM_PROVIDER"]),
    ("llm.api_key", &["AMPLIFY_LLM_API_KEY"]),
    ("llm.base_url", &["AMPLIFY_LLM_BASE_URL"]),
    ("llm.model", &["AMPLIFY_LLM_MODEL"]),
    ("llm.temperature", &["AMPLIFY_LLM_TEMPERATURE"]),
    ("llm.max_tokens", &["AMPLIFY_LLM_MAX_TOKENS"]),
    ("llm.timeout_secs", &["AMPLIFY_LLM_TIMEOUT_SECS"]),
    ("email.api_key", &["AMPLIFY_EMAIL_API_KEY"]),
    ("email.base_url", &["AMPLIFY_EMAIL_BASE_URL"]),
    ("email.from_address", &["AMPLIFY_EMAIL_FROM_ADDRESS"]),
    ("email.timeout_secs", &["AMPLIFY_EMAIL_TIMEOUT_SECS"]),
    ("proposal.company_name", &["AMPLIFY_PROPOSAL_COMPANY_NAME"]),
    ("proposal.legal_name", &["AMPLIFY_PROPOSAL_LEGAL_NAME"]),
    ("proposal.company_url", &["AMPLIFY_PROPOSAL_COMPANY_URL"]),
    ("proposal.validity_days", &["AMPLIFY_PROPOSAL_VALIDITY_DAYS"]),
    ("server.bind_address", &["AMPLIFY_SERVER_BIND_ADDRESS"]),
    ("server.port", &["AMPLIFY_SERVER_PORT"]),
    ("server.graceful_shutdown_secs", &["AMPLIFY_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ("server.session_idle_secs", &["AMPLIFY_SERVER_SESSION_IDLE_SECS"]),
    ("logging.level", &["AMPLIFY_LOGGING_LEVEL", "AMPLIFY_LOG_LEVEL"]),
    ("logging.format", &["AMPLIFY_LOGGING_FORMAT", "AMPLIFY_LOG_FORMAT"]),
];

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let sources: Map<String, JsonValue> = ATTRIBUTED_KEYS
        .iter()
        .map(|(key_path, env_keys)| {
            let source = field_source(
                key_path,
                env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            );
            (key_path.to_string(), JsonValue::String(source))
        })
        .collect();

    let data = serde_json::json!({
        "precedence": "env > file > default",
        "config_file": config_file_path.map(|path| path.display().to_string()),
        "effective": config.redacted(),
        "sources": sources,
    });

    CommandResult::success_with_data("config", "effective configuration", Some(data))
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("amplify.toml"), PathBuf::from("config/amplify.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
