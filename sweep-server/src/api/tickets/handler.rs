//! Ticket API Handlers

use axum::{
    Json,
    extract::{Extension, Multipart, Path, Query, State},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{
    GeoPoint, Severity, StatusChange, Ticket, TicketDraft, TicketStatus,
};
use crate::db::repository::TicketFilter;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_UPLOAD_BYTES, MAX_URL_LEN, validate_coordinates,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<TicketStatus>,
    pub limit: Option<usize>,
}

/// GET /api/tickets - list tickets, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = state
        .tickets
        .find_all(&TicketFilter {
            status: query.status,
            limit: query.limit,
        })
        .await?;
    Ok(Json(tickets))
}

/// GET /api/tickets/:id - fetch a single ticket
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .tickets
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ticket {} not found", id)))?;
    Ok(Json(ticket))
}

/// Create-ticket body: severity already known (client-side analysis), image
/// either inline base64 or an already-hosted URL
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub location: GeoPoint,
    pub description: String,
    /// Severity level (1-3)
    pub severity: u8,
    /// Inline image, optionally with a data-URI prefix
    pub image_base64: Option<String>,
    /// Fallback when the image is already hosted
    pub image_url: Option<String>,
}

/// POST /api/tickets - create a pre-classified ticket
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateTicketRequest>,
) -> AppResult<Json<Ticket>> {
    validate_required_text(&req.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_coordinates(req.location.lat, req.location.lon)?;
    let severity = Severity::from_level(req.severity)
        .ok_or_else(|| AppError::validation(format!("severity level {} out of range", req.severity)))?;

    let image_url = match &req.image_base64 {
        Some(data) => {
            // Strip data-URI prefix if present
            let raw = match data.split_once(',') {
                Some((prefix, rest)) if prefix.starts_with("data:") => rest,
                _ => data.as_str(),
            };
            let bytes = BASE64
                .decode(raw.trim())
                .map_err(|e| AppError::validation(format!("invalid base64 image: {}", e)))?;
            if bytes.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::validation(format!(
                    "image too large (max {} bytes)",
                    MAX_UPLOAD_BYTES
                )));
            }
            state.intake.store_image(&bytes).await?.url
        }
        None => {
            let url = req
                .image_url
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string();
            validate_required_text(&url, "image_url", MAX_URL_LEN)?;
            url
        }
    };

    let ticket = state
        .intake
        .file_ticket(TicketDraft {
            location: req.location,
            description: req.description,
            image_url,
            severity: Some(severity),
            status: TicketStatus::Open,
            reported_by: Some(user.id.clone()),
            ingest_key: None,
        })
        .await?;

    tracing::info!(
        ticket_id = %ticket.id_string(),
        severity = %severity,
        reported_by = %user.username,
        "Ticket created"
    );
    Ok(Json(ticket))
}

/// POST /api/tickets/classify - full classify orchestration
///
/// Multipart fields: `image` (file), `lat`, `lon`, optional `description`.
pub async fn classify(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<Ticket>> {
    let mut image: Option<Vec<u8>> = None;
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;
    let mut description = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => image = Some(field.bytes().await?.to_vec()),
            "lat" => lat = Some(parse_coord(&field.text().await?, "lat")?),
            "lon" => lon = Some(parse_coord(&field.text().await?, "lon")?),
            "description" => description = field.text().await?,
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let image = image.ok_or_else(|| AppError::validation("image field is required"))?;
    if image.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::validation(format!(
            "image too large (max {} bytes)",
            MAX_UPLOAD_BYTES
        )));
    }
    let location = GeoPoint {
        lat: lat.ok_or_else(|| AppError::validation("lat field is required"))?,
        lon: lon.ok_or_else(|| AppError::validation("lon field is required"))?,
    };
    validate_coordinates(location.lat, location.lon)?;
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation(format!(
            "description is too long (max {} chars)",
            MAX_DESCRIPTION_LEN
        )));
    }

    let ticket = state
        .intake
        .submit(&image, location, description, Some(user.id.clone()))
        .await?;
    Ok(Json(ticket))
}

/// POST /api/tickets/:id/classify - re-run classification
pub async fn reclassify(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.intake.reclassify(&id).await?;
    Ok(Json(ticket))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TicketStatus,
    /// Revision the caller last saw; rejected with a conflict when stale
    pub expected_revision: Option<i64>,
    /// Backward transition override (admin only)
    #[serde(default)]
    pub force: bool,
}

/// PUT /api/tickets/:id/status - advance the ticket lifecycle
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<Ticket>> {
    if req.force && !user.is_admin() {
        return Err(AppError::forbidden(
            "Only admins may override the status order",
        ));
    }

    let ticket = state
        .tickets
        .update_status(
            &id,
            StatusChange {
                status: req.status,
                actor: Some(user.id.clone()),
                expected_revision: req.expected_revision,
                force: req.force,
            },
        )
        .await?;

    tracing::info!(
        ticket_id = %id,
        status = %req.status,
        actor = %user.username,
        "Ticket status updated"
    );
    Ok(Json(ticket))
}

fn parse_coord(value: &str, field: &str) -> AppResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("{field} must be a number")))
}
