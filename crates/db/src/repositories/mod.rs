use async_trait::async_trait;
use thiserror::Error;

use amplify_core::domain::proposal::{ProposalId, ProposalRecord};

pub mod memory;
pub mod proposal;

pub use memory::InMemoryProposalLogRepository;
pub use proposal::SqlProposalLogRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Append-only record of proposals that left the building. Entries are never
/// updated or deleted.
#[async_trait]
pub trait ProposalLogRepository: Send + Sync {
    async fn append(&self, record: ProposalRecord) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<ProposalRecord>, RepositoryError>;
    /// Newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<ProposalRecord>, RepositoryError>;
}
