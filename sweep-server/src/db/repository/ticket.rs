//! Ticket Repository
//!
//! Status changes go through a revision-guarded conditional update so that
//! concurrent writers for the same ticket serialize instead of clobbering
//! each other; classification results promote a pending ticket without ever
//! demoting a manually advanced one.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Severity, StatusChange, Ticket, TicketDraft, TicketStatus};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "ticket";

/// List filter for [`TicketRepository::find_all`]
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub limit: Option<usize>,
}

#[derive(Clone)]
pub struct TicketRepository {
    base: BaseRepository,
}

impl TicketRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a ticket, assigning id, timestamps, and revision 0
    pub async fn create(&self, draft: TicketDraft) -> RepoResult<Ticket> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE ticket SET
                    location = $location,
                    description = $description,
                    image_url = $image_url,
                    severity = $severity,
                    status = $status,
                    reported_by = $reported_by,
                    claimed_by = NONE,
                    ingest_key = $ingest_key,
                    created_at = $now,
                    updated_at = $now,
                    revision = 0
                RETURN AFTER"#,
            )
            .bind(("location", draft.location))
            .bind(("description", draft.description))
            .bind(("image_url", draft.image_url))
            .bind(("severity", draft.severity))
            .bind(("status", draft.status))
            .bind(("reported_by", draft.reported_by))
            .bind(("ingest_key", draft.ingest_key))
            .bind(("now", now))
            .await?;

        let created: Option<Ticket> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create ticket".to_string()))
    }

    /// Find ticket by id ("ticket:key" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Ticket>> {
        let thing = record_id(TABLE, id)?;
        let ticket: Option<Ticket> = self.base.db().select(thing).await?;
        Ok(ticket)
    }

    /// List tickets, newest first
    pub async fn find_all(&self, filter: &TicketFilter) -> RepoResult<Vec<Ticket>> {
        let mut query = String::from("SELECT * FROM ticket");
        if filter.status.is_some() {
            query.push_str(" WHERE status = $status");
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("status", filter.status))
            .await?;
        let mut tickets: Vec<Ticket> = result.take(0)?;

        // Cap after the fetch: the embedded SDK drops rows when LIMIT is
        // combined with WHERE + ORDER BY.
        if let Some(limit) = filter.limit {
            tickets.truncate(limit);
        }
        Ok(tickets)
    }

    /// Apply a status change, enforcing forward-only transitions
    ///
    /// Backward transitions require `change.force`. A revision mismatch
    /// (either the caller's `expected_revision` or a write that landed
    /// between this read and the update) yields [`RepoError::Conflict`].
    pub async fn update_status(&self, id: &str, change: StatusChange) -> RepoResult<Ticket> {
        let thing = record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Ticket {} not found", id)))?;

        if !change.force && !existing.status.can_advance_to(change.status) {
            return Err(RepoError::Conflict(format!(
                "Cannot move ticket from {} to {}",
                existing.status, change.status
            )));
        }

        let expected_revision = change.expected_revision.unwrap_or(existing.revision);
        if expected_revision != existing.revision {
            return Err(RepoError::Conflict(format!(
                "Ticket {} changed concurrently (revision {} != {})",
                id, existing.revision, expected_revision
            )));
        }

        // Volunteer attribution: claiming happens when the ticket moves
        // into active handling.
        let claimed_by = match change.status {
            TicketStatus::InProgress | TicketStatus::Resolved => change.actor,
            _ => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $status,
                    claimed_by = $claimed_by OR claimed_by,
                    updated_at = $now,
                    revision = revision + 1
                WHERE revision = $revision
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("status", change.status))
            .bind(("claimed_by", claimed_by))
            .bind(("now", now_millis()))
            .bind(("revision", expected_revision))
            .await?;

        result.take::<Option<Ticket>>(0)?.ok_or_else(|| {
            RepoError::Conflict(format!("Ticket {} changed concurrently", id))
        })
    }

    /// Record a classification result
    ///
    /// Overwrites severity and promotes the ticket to open only while it is
    /// still pending classification, so a late result never demotes a newer
    /// manual status. Safe to re-invoke for the same ticket.
    pub async fn set_classification(&self, id: &str, severity: Severity) -> RepoResult<Ticket> {
        let thing = record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    severity = $severity,
                    status = IF status = 'pending_classification' THEN 'open' ELSE status END,
                    updated_at = $now,
                    revision = revision + 1
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("severity", severity))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Ticket>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Ticket {} not found", id)))
    }

    /// Look up an ingested ticket by its dedup key
    pub async fn find_by_ingest_key(&self, key: &str) -> RepoResult<Option<Ticket>> {
        let key_owned = key.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM ticket WHERE ingest_key = $key LIMIT 1")
            .bind(("key", key_owned))
            .await?;
        let tickets: Vec<Ticket> = result.take(0)?;
        Ok(tickets.into_iter().next())
    }
}
