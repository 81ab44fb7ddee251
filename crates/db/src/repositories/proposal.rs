use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use amplify_core::domain::campaign::CampaignConfig;
use amplify_core::domain::proposal::{ProposalId, ProposalRecord};

use super::{ProposalLogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProposalLogRepository {
    pool: DbPool,
}

impl SqlProposalLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_err(error: impl ToString) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ProposalRecord, RepositoryError> {
    let id: String = row.try_get("id").map_err(decode_err)?;
    let artist_name: String = row.try_get("artist_name").map_err(decode_err)?;
    let song_title: String = row.try_get("song_title").map_err(decode_err)?;
    let recipient_email: String = row.try_get("recipient_email").map_err(decode_err)?;
    let total_amount: String = row.try_get("total_amount").map_err(decode_err)?;
    let commission_total: String = row.try_get("commission_total").map_err(decode_err)?;
    let services_included: String = row.try_get("services_included").map_err(decode_err)?;
    let email_id: String = row.try_get("email_id").map_err(decode_err)?;
    let used_fallback: bool = row.try_get("used_fallback").map_err(decode_err)?;
    let created_at: String = row.try_get("created_at").map_err(decode_err)?;

    let services_included: CampaignConfig = serde_json::from_str(&services_included)
        .map_err(|e| RepositoryError::Decode(format!("services_included: {e}")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("created_at: {e}")))?;

    Ok(ProposalRecord {
        id: ProposalId(id),
        artist_name,
        song_title,
        recipient_email,
        total_amount: Decimal::from_str(&total_amount)
            .map_err(|e| RepositoryError::Decode(format!("total_amount: {e}")))?,
        commission_total: Decimal::from_str(&commission_total)
            .map_err(|e| RepositoryError::Decode(format!("commission_total: {e}")))?,
        services_included,
        email_id,
        used_fallback,
        created_at,
    })
}

#[async_trait::async_trait]
impl ProposalLogRepository for SqlProposalLogRepository {
    async fn append(&self, record: ProposalRecord) -> Result<(), RepositoryError> {
        let services_included = serde_json::to_string(&record.services_included)
            .map_err(|e| RepositoryError::Decode(format!("services_included: {e}")))?;

        sqlx::query(
            "INSERT INTO proposal_log (id, artist_name, song_title, recipient_email, total_amount,
                                       commission_total, services_included, email_id,
                                       used_fallback, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id.0)
        .bind(&record.artist_name)
        .bind(&record.song_title)
        .bind(&record.recipient_email)
        .bind(record.total_amount.to_string())
        .bind(record.commission_total.to_string())
        .bind(services_included)
        .bind(&record.email_id)
        .bind(record.used_fallback)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<ProposalRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, artist_name, song_title, recipient_email, total_amount, commission_total,
                    services_included, email_id, used_fallback, created_at
             FROM proposal_log WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ProposalRecord>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, artist_name, song_title, recipient_email, total_amount, commission_total,
                    services_included, email_id, used_fallback, created_at
             FROM proposal_log
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect::<Result<Vec<_>, _>>()
    }
}
