use tokio::sync::RwLock;

use amplify_core::domain::proposal::{ProposalId, ProposalRecord};

use super::{ProposalLogRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProposalLogRepository {
    records: RwLock<Vec<ProposalRecord>>,
}

impl InMemoryProposalLogRepository {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ProposalLogRepository for InMemoryProposalLogRepository {
    async fn append(&self, record: ProposalRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Decode(format!(
                "proposal `{}` is already logged",
                record.id.0
            )));
        }
        records.push(record);
        Ok(())
    }

    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<ProposalRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| &record.id == id).cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ProposalRecord>, RepositoryError> {
        let records = self.records.read().await;
        let mut recent = records.clone();
        recent.sort_by(|left, right| {
            right.created_at.cmp(&left.created_at).then_with(|| right.id.cmp(&left.id))
        });
        recent.truncate(limit as usize);
        Ok(recent)
    }
}
