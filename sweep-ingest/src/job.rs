//! Batch ingestion runner
//!
//! Walks an image drop directory, derives severity from filenames, uploads
//! each frame, and writes tickets directly in `open` (severity is already
//! known, so classification is bypassed). Every failure is per-record: the
//! batch always continues, and a summary is logged at the end.
//!
//! Re-running over an unchanged drop creates nothing — each file's
//! `"{camera}/{filename}"` dedup key is checked before insert.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sweep_server::db::models::{GeoPoint, TicketDraft, TicketStatus};
use sweep_server::db::repository::TicketRepository;
use sweep_server::services::ObjectStore;
use sweep_server::services::image::normalize_jpeg;
use thiserror::Error;

use crate::catalog::CameraCatalog;
use crate::filename::{ParseError, parse_filename};

/// Per-run counters, logged at the end of the batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Files considered (after the --limit cap)
    pub scanned: usize,
    pub created: usize,
    /// Already ingested in a previous run
    pub duplicates: usize,
    pub parse_errors: usize,
    pub lookup_errors: usize,
    /// Upload/database failures
    pub failed: usize,
}

enum Outcome {
    Created(String),
    Duplicate,
}

#[derive(Debug, Error)]
enum RecordError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no catalog entry for camera {0}")]
    Lookup(u32),

    #[error("{0}")]
    Failed(String),
}

pub struct IngestJob {
    tickets: TicketRepository,
    store: Arc<dyn ObjectStore>,
    catalog: CameraCatalog,
    limit: Option<usize>,
}

impl IngestJob {
    pub fn new(
        tickets: TicketRepository,
        store: Arc<dyn ObjectStore>,
        catalog: CameraCatalog,
        limit: Option<usize>,
    ) -> Self {
        Self {
            tickets,
            store,
            catalog,
            limit,
        }
    }

    /// Process the image drop directory
    pub async fn run(&self, images_dir: &Path) -> anyhow::Result<IngestStats> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(images_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        if let Some(limit) = self.limit
            && files.len() > limit
        {
            tracing::info!(limit, total = files.len(), "Capping files processed this run");
            files.truncate(limit);
        }

        let mut stats = IngestStats::default();
        for path in &files {
            stats.scanned += 1;
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();

            match self.ingest_file(path, &filename).await {
                Ok(Outcome::Created(ticket_id)) => {
                    tracing::info!(file = %filename, ticket_id = %ticket_id, "Ticket ingested");
                    stats.created += 1;
                }
                Ok(Outcome::Duplicate) => {
                    tracing::debug!(file = %filename, "Already ingested, skipping");
                    stats.duplicates += 1;
                }
                Err(RecordError::Parse(e)) => {
                    tracing::warn!(file = %filename, error = %e, "Skipping unparseable filename");
                    stats.parse_errors += 1;
                }
                Err(RecordError::Lookup(camera)) => {
                    tracing::warn!(file = %filename, camera, "Skipping unknown camera");
                    stats.lookup_errors += 1;
                }
                Err(RecordError::Failed(e)) => {
                    tracing::warn!(file = %filename, error = %e, "Failed to ingest file");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(
            scanned = stats.scanned,
            created = stats.created,
            duplicates = stats.duplicates,
            parse_errors = stats.parse_errors,
            lookup_errors = stats.lookup_errors,
            failed = stats.failed,
            "Ingestion finished"
        );
        Ok(stats)
    }

    async fn ingest_file(&self, path: &Path, filename: &str) -> Result<Outcome, RecordError> {
        let parsed = parse_filename(filename)?;
        let camera = self
            .catalog
            .get(parsed.camera)
            .ok_or(RecordError::Lookup(parsed.camera))?;

        // Dedup check before any side effect
        let ingest_key = format!("{}/{}", parsed.camera, filename);
        let existing = self
            .tickets
            .find_by_ingest_key(&ingest_key)
            .await
            .map_err(|e| RecordError::Failed(e.to_string()))?;
        if existing.is_some() {
            return Ok(Outcome::Duplicate);
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| RecordError::Failed(format!("reading {}: {}", path.display(), e)))?;
        let jpeg = normalize_jpeg(&bytes).map_err(|e| RecordError::Failed(e.to_string()))?;
        let stored = self
            .store
            .put_image(&jpeg)
            .await
            .map_err(|e| RecordError::Failed(e.to_string()))?;

        let ticket = self
            .tickets
            .create(TicketDraft {
                location: GeoPoint {
                    lat: camera.lat,
                    lon: camera.lon,
                },
                description: camera.name.clone(),
                image_url: stored.url,
                severity: Some(parsed.severity),
                status: TicketStatus::Open,
                reported_by: None,
                ingest_key: Some(ingest_key),
            })
            .await
            .map_err(|e| RecordError::Failed(e.to_string()))?;

        Ok(Outcome::Created(ticket.id_string()))
    }
}
