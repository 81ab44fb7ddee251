use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use amplify_core::audit::{AuditSink, TracingAuditSink};
use amplify_core::config::{AppConfig, ConfigError, LoadOptions};
use amplify_db::{connect_with_config, migrations, DbPool, SqlProposalLogRepository};
use amplify_proposal::{ProposalError, ProposalService};

use crate::api::ApiState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub proposals: Arc<ProposalService>,
    pub audit: Arc<dyn AuditSink>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("proposal service setup failed: {0}")]
    Proposal(#[from] ProposalError),
}

impl Application {
    pub fn api_state(&self) -> ApiState {
        ApiState::new(
            self.config.portal.password.clone(),
            self.proposals.clone(),
            self.audit.clone(),
        )
        .with_idle_timeout(Duration::from_secs(self.config.server.session_idle_secs))
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_config(&config.database)
        .await
        .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);
    let log = Arc::new(SqlProposalLogRepository::new(db_pool.clone()));
    let proposals = Arc::new(ProposalService::from_config(&config, log, audit.clone())?);
    info!(
        event_name = "system.bootstrap.proposal_service_ready",
        correlation_id = "bootstrap",
        text_generation = proposals.has_generator(),
        "proposal service configured"
    );

    Ok(Application { config, db_pool, proposals, audit })
}
