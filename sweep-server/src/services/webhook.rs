//! Ticket-created webhook
//!
//! Fire-and-forget notification to a configured endpoint whenever a ticket
//! is inserted. Delivery failures are logged and never affect the request
//! that created the ticket.

use std::time::Duration;

use crate::db::models::Ticket;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, url }
    }

    /// Post a `ticket_created` event; spawned, never awaited by the caller
    pub fn notify_ticket_created(&self, ticket: &Ticket) {
        let payload = serde_json::json!({
            "type": "ticket_created",
            "ticket": ticket,
        });
        let client = self.client.clone();
        let url = self.url.clone();
        let ticket_id = ticket.id_string();

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(
                        ticket_id = %ticket_id,
                        status = %resp.status(),
                        "Webhook endpoint returned non-success status"
                    );
                }
                Ok(_) => {
                    tracing::debug!(ticket_id = %ticket_id, "ticket_created webhook delivered");
                }
                Err(e) => {
                    tracing::warn!(
                        ticket_id = %ticket_id,
                        error = %e,
                        "ticket_created webhook delivery failed"
                    );
                }
            }
        });
    }
}
