//! Ticket Model
//!
//! A litter report: location, image reference, severity, and lifecycle
//! status. Tickets are soft-closed through status transitions and never
//! deleted.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Ticket ID type
pub type TicketId = RecordId;

/// Ordered severity category set
///
/// Filename ingestion maps by level (1-3); the classification service
/// scores 1-10 and maps by bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Ordinal level of the category (1-3)
    pub fn level(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    /// Map a filename severity level (1-3)
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Severity::Low),
            2 => Some(Severity::Medium),
            3 => Some(Severity::High),
            _ => None,
        }
    }

    /// Map a classifier score (1-10 scale) into the category set
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1..=3 => Some(Severity::Low),
            4..=7 => Some(Severity::Medium),
            8..=10 => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ticket lifecycle status
///
/// `pending_classification` marks tickets whose image and metadata are
/// stored but whose severity assignment has not yet succeeded. Transitions
/// are forward-only: pending_classification → open → in_progress → resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    PendingClassification,
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::PendingClassification => "pending_classification",
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
        }
    }

    fn rank(self) -> u8 {
        match self {
            TicketStatus::PendingClassification => 0,
            TicketStatus::Open => 1,
            TicketStatus::InProgress => 2,
            TicketStatus::Resolved => 3,
        }
    }

    /// Whether moving to `next` is a forward transition
    pub fn can_advance_to(self, next: TicketStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Ticket record
///
/// `image_url` is immutable once set; a re-upload produces a new object key,
/// never an in-place overwrite. `revision` backs the per-ticket conditional
/// update used to serialize status changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<TicketId>,
    pub location: GeoPoint,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub status: TicketStatus,
    /// User who filed the report, if any
    #[serde(default)]
    pub reported_by: Option<String>,
    /// Volunteer who moved the ticket forward
    #[serde(default)]
    pub claimed_by: Option<String>,
    /// Dedup key, set only by the ingestion job ("{camera}/{filename}")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingest_key: Option<String>,
    /// Creation time (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
    /// Optimistic-concurrency counter
    #[serde(default)]
    pub revision: i64,
}

impl Ticket {
    /// Record id as "ticket:key" string
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

/// Create ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDraft {
    pub location: GeoPoint,
    pub description: String,
    pub image_url: String,
    pub severity: Option<Severity>,
    pub status: TicketStatus,
    pub reported_by: Option<String>,
    pub ingest_key: Option<String>,
}

/// Status change request applied by the repository
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: TicketStatus,
    /// User performing the change; recorded as `claimed_by` when the ticket
    /// moves into in_progress or resolved
    pub actor: Option<String>,
    /// Expected current revision; `None` guards against writes between the
    /// repository's own read and write only
    pub expected_revision: Option<i64>,
    /// Permit a backward transition (admin override)
    pub force: bool,
}
