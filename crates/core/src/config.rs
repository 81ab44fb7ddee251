use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub portal: PortalConfig,
    pub llm: LlmConfig,
    pub email: EmailConfig,
    pub proposal: ProposalConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub password: SecretString,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub from_address: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ProposalConfig {
    pub company_name: String,
    /// Name used in the proposal disclaimer.
    pub legal_name: String,
    pub company_url: String,
    pub validity_days: u32,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    /// Portal sessions untouched for this long are dropped.
    pub session_idle_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    #[serde(alias = "openai")]
    OpenAi,
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub portal_password: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub email_api_key: Option<String>,
    pub server_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://amplify.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            portal: PortalConfig { password: String::new().into() },
            llm: LlmConfig {
                provider: LlmProvider::Disabled,
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 2_000,
                timeout_secs: 30,
            },
            email: EmailConfig {
                api_key: None,
                base_url: "https://api.resend.com".to_string(),
                from_address: "Artist Influence <proposals@artistinfluence.com>".to_string(),
                timeout_secs: 15,
            },
            proposal: ProposalConfig {
                company_name: "Artist Influence".to_string(),
                legal_name: "Artist Influence, LLC".to_string(),
                company_url: "https://artistinfluence.com".to_string(),
                validity_days: 14,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
                session_idle_secs: 1_800,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected openai|disabled)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("amplify.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Effective configuration as TOML-shaped JSON with every secret replaced
    /// by a presence marker.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "database": {
                "url": self.database.url,
                "max_connections": self.database.max_connections,
                "timeout_secs": self.database.timeout_secs,
            },
            "portal": { "password": redact(Some(&self.portal.password)) },
            "llm": {
                "provider": self.llm.provider,
                "api_key": redact(self.llm.api_key.as_ref()),
                "base_url": self.llm.base_url,
                "model": self.llm.model,
                "temperature": self.llm.temperature,
                "max_tokens": self.llm.max_tokens,
                "timeout_secs": self.llm.timeout_secs,
            },
            "email": {
                "api_key": redact(self.email.api_key.as_ref()),
                "base_url": self.email.base_url,
                "from_address": self.email.from_address,
                "timeout_secs": self.email.timeout_secs,
            },
            "proposal": {
                "company_name": self.proposal.company_name,
                "legal_name": self.proposal.legal_name,
                "company_url": self.proposal.company_url,
                "validity_days": self.proposal.validity_days,
            },
            "server": {
                "bind_address": self.server.bind_address,
                "port": self.server.port,
                "graceful_shutdown_secs": self.server.graceful_shutdown_secs,
                "session_idle_secs": self.server.session_idle_secs,
            },
            "logging": { "level": self.logging.level, "format": self.logging.format },
        })
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(portal) = patch.portal {
            if let Some(password) = portal.password {
                self.portal.password = secret_value(password);
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(api_key) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if let Some(max_tokens) = llm.max_tokens {
                self.llm.max_tokens = max_tokens;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(email) = patch.email {
            if let Some(api_key) = email.api_key {
                self.email.api_key = Some(secret_value(api_key));
            }
            if let Some(base_url) = email.base_url {
                self.email.base_url = base_url;
            }
            if let Some(from_address) = email.from_address {
                self.email.from_address = from_address;
            }
            if let Some(timeout_secs) = email.timeout_secs {
                self.email.timeout_secs = timeout_secs;
            }
        }

        if let Some(proposal) = patch.proposal {
            if let Some(company_name) = proposal.company_name {
                self.proposal.company_name = company_name;
            }
            if let Some(legal_name) = proposal.legal_name {
                self.proposal.legal_name = legal_name;
            }
            if let Some(company_url) = proposal.company_url {
                self.proposal.company_url = company_url;
            }
            if let Some(validity_days) = proposal.validity_days {
                self.proposal.validity_days = validity_days;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(session_idle_secs) = server.session_idle_secs {
                self.server.session_idle_secs = session_idle_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("AMPLIFY_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("AMPLIFY_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("AMPLIFY_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("AMPLIFY_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("AMPLIFY_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("AMPLIFY_PORTAL_PASSWORD") {
            self.portal.password = secret_value(value);
        }

        if let Some(value) = read_env("AMPLIFY_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        if let Some(value) = read_env("AMPLIFY_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("AMPLIFY_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("AMPLIFY_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("AMPLIFY_LLM_TEMPERATURE") {
            self.llm.temperature = parse_f32("AMPLIFY_LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = read_env("AMPLIFY_LLM_MAX_TOKENS") {
            self.llm.max_tokens = parse_u32("AMPLIFY_LLM_MAX_TOKENS", &value)?;
        }
        if let Some(value) = read_env("AMPLIFY_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("AMPLIFY_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("AMPLIFY_EMAIL_API_KEY") {
            self.email.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("AMPLIFY_EMAIL_BASE_URL") {
            self.email.base_url = value;
        }
        if let Some(value) = read_env("AMPLIFY_EMAIL_FROM_ADDRESS") {
            self.email.from_address = value;
        }
        if let Some(value) = read_env("AMPLIFY_EMAIL_TIMEOUT_SECS") {
            self.email.timeout_secs = parse_u64("AMPLIFY_EMAIL_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("AMPLIFY_PROPOSAL_COMPANY_NAME") {
            self.proposal.company_name = value;
        }
        if let Some(value) = read_env("AMPLIFY_PROPOSAL_LEGAL_NAME") {
            self.proposal.legal_name = value;
        }
        if let Some(value) = read_env("AMPLIFY_PROPOSAL_COMPANY_URL") {
            self.proposal.company_url = value;
        }
        if let Some(value) = read_env("AMPLIFY_PROPOSAL_VALIDITY_DAYS") {
            self.proposal.validity_days = parse_u32("AMPLIFY_PROPOSAL_VALIDITY_DAYS", &value)?;
        }

        if let Some(value) = read_env("AMPLIFY_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("AMPLIFY_SERVER_PORT") {
            self.server.port = parse_u16("AMPLIFY_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("AMPLIFY_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("AMPLIFY_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("AMPLIFY_SERVER_SESSION_IDLE_SECS") {
            self.server.session_idle_secs = parse_u64("AMPLIFY_SERVER_SESSION_IDLE_SECS", &value)?;
        }

        let log_level =
            read_env("AMPLIFY_LOGGING_LEVEL").or_else(|| read_env("AMPLIFY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("AMPLIFY_LOGGING_FORMAT").or_else(|| read_env("AMPLIFY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(portal_password) = overrides.portal_password {
            self.portal.password = secret_value(portal_password);
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(email_api_key) = overrides.email_api_key {
            self.email.api_key = Some(secret_value(email_api_key));
        }
        if let Some(server_port) = overrides.server_port {
            self.server.port = server_port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_portal(&self.portal)?;
        validate_llm(&self.llm)?;
        validate_email(&self.email)?;
        validate_proposal(&self.proposal)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn redact(secret: Option<&SecretString>) -> &'static str {
    match secret {
        Some(value) if !value.expose_secret().is_empty() => "[redacted]",
        _ => "[unset]",
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("amplify.toml"), PathBuf::from("config/amplify.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_portal(portal: &PortalConfig) -> Result<(), ConfigError> {
    if portal.password.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "portal.password is required. Set it in amplify.toml or AMPLIFY_PORTAL_PASSWORD"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::Validation(
            "llm.temperature must be in range 0.0..=2.0".to_string(),
        ));
    }

    if llm.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "llm.max_tokens must be greater than zero".to_string(),
        ));
    }

    if llm.provider == LlmProvider::OpenAi {
        let missing = llm
            .api_key
            .as_ref()
            .map(|value| value.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing {
            return Err(ConfigError::Validation(
                "llm.api_key is required for the openai provider".to_string(),
            ));
        }
        validate_http_url("llm.base_url", &llm.base_url)?;
    }

    Ok(())
}

fn validate_email(email: &EmailConfig) -> Result<(), ConfigError> {
    validate_http_url("email.base_url", &email.base_url)?;

    if !email.from_address.contains('@') {
        return Err(ConfigError::Validation(
            "email.from_address must contain an email address".to_string(),
        ));
    }

    if email.timeout_secs == 0 || email.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "email.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_proposal(proposal: &ProposalConfig) -> Result<(), ConfigError> {
    if proposal.company_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "proposal.company_name must not be empty".to_string(),
        ));
    }
    if proposal.legal_name.trim().is_empty() {
        return Err(ConfigError::Validation("proposal.legal_name must not be empty".to_string()));
    }
    if proposal.validity_days == 0 {
        return Err(ConfigError::Validation(
            "proposal.validity_days must be greater than zero".to_string(),
        ));
    }
    validate_http_url("proposal.company_url", &proposal.company_url)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    if server.session_idle_secs == 0 {
        return Err(ConfigError::Validation(
            "server.session_idle_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{key} must start with http:// or https://")))
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| invalid_override(key, value))
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| invalid_override(key, value))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| invalid_override(key, value))
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    portal: Option<PortalPatch>,
    llm: Option<LlmPatch>,
    email: Option<EmailPatch>,
    proposal: Option<ProposalPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PortalPatch {
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct EmailPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    from_address: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProposalPatch {
    company_name: Option<String>,
    legal_name: Option<String>,
    company_url: Option<String>,
    validity_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    session_idle_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
