//! Classify orchestration
//!
//! The one multi-step workflow: raw image + location in, persisted
//! classified ticket out. Failure policy per step:
//!
//! 1. Upload — failure aborts with `UploadFailed`, no ticket record exists.
//! 2. Create the ticket as `pending_classification` — it is visible from
//!    this point regardless of how classification goes.
//! 3. Classify — success promotes the ticket to `open` with a severity;
//!    failure surfaces `ClassificationFailed` naming the ticket, which stays
//!    queryable and re-classifiable.

use std::sync::Arc;

use crate::db::models::{GeoPoint, Ticket, TicketDraft, TicketStatus};
use crate::db::repository::TicketRepository;
use crate::services::classifier::Classifier;
use crate::services::image::normalize_jpeg;
use crate::services::object_store::{ObjectStore, StoredImage};
use crate::services::webhook::WebhookNotifier;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct TicketIntake {
    store: Arc<dyn ObjectStore>,
    classifier: Arc<dyn Classifier>,
    tickets: TicketRepository,
    webhook: Option<WebhookNotifier>,
}

impl TicketIntake {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        classifier: Arc<dyn Classifier>,
        tickets: TicketRepository,
        webhook: Option<WebhookNotifier>,
    ) -> Self {
        Self {
            store,
            classifier,
            tickets,
            webhook,
        }
    }

    /// Normalize and upload an image, returning the stored reference
    ///
    /// Also used by the direct-create path where severity is already known.
    pub async fn store_image(&self, image: &[u8]) -> AppResult<StoredImage> {
        let jpeg = normalize_jpeg(image)?;
        Ok(self.store.put_image(&jpeg).await?)
    }

    /// Persist a new ticket and fire the creation webhook
    pub async fn file_ticket(&self, draft: TicketDraft) -> AppResult<Ticket> {
        let ticket = self.tickets.create(draft).await?;
        if let Some(webhook) = &self.webhook {
            webhook.notify_ticket_created(&ticket);
        }
        Ok(ticket)
    }

    /// Full classify orchestration for a freshly reported image
    pub async fn submit(
        &self,
        image: &[u8],
        location: GeoPoint,
        description: String,
        reporter: Option<String>,
    ) -> AppResult<Ticket> {
        let stored = self.store_image(image).await?;

        let ticket = self
            .file_ticket(TicketDraft {
                location,
                description,
                image_url: stored.url,
                severity: None,
                status: TicketStatus::PendingClassification,
                reported_by: reporter,
                ingest_key: None,
            })
            .await?;

        let id = ticket.id_string();
        tracing::info!(ticket_id = %id, "Ticket filed, pending classification");
        self.classify_ticket(&id).await
    }

    /// Re-run classification for an existing ticket
    ///
    /// Safe to repeat: severity is overwritten in place, no duplicate ticket
    /// is ever created, and a manually advanced status is left alone.
    pub async fn reclassify(&self, id: &str) -> AppResult<Ticket> {
        self.classify_ticket(id).await
    }

    async fn classify_ticket(&self, id: &str) -> AppResult<Ticket> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ticket {} not found", id)))?;

        match self.classifier.classify(&ticket.image_url).await {
            Ok(severity) => {
                let updated = self.tickets.set_classification(id, severity).await?;
                tracing::info!(
                    ticket_id = %id,
                    severity = %severity,
                    status = %updated.status,
                    "Ticket classified"
                );
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(ticket_id = %id, error = %e, "Classification failed");
                Err(AppError::classification_failed(format!(
                    "classification failed for {}: {}; the ticket is pending and can be re-classified",
                    id, e
                )))
            }
        }
    }
}
