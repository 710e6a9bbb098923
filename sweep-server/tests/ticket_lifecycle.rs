//! Ticket lifecycle invariants against the embedded database
//! Run: cargo test -p sweep-server --test ticket_lifecycle

use sweep_server::db;
use sweep_server::db::models::{
    GeoPoint, Severity, StatusChange, TicketDraft, TicketStatus,
};
use sweep_server::db::repository::{RepoError, TicketFilter, TicketRepository};

async fn test_repo() -> (tempfile::TempDir, TicketRepository) {
    let tmp = tempfile::tempdir().unwrap();
    let database = db::connect(tmp.path().to_str().unwrap()).await.unwrap();
    (tmp, TicketRepository::new(database))
}

fn draft(description: &str, status: TicketStatus, severity: Option<Severity>) -> TicketDraft {
    TicketDraft {
        location: GeoPoint {
            lat: 43.648,
            lon: -79.380,
        },
        description: description.to_string(),
        image_url: format!("https://cdn.example/{description}.jpg"),
        severity,
        status,
        reported_by: None,
        ingest_key: None,
    }
}

fn change(status: TicketStatus) -> StatusChange {
    StatusChange {
        status,
        actor: Some("user:vol1".to_string()),
        expected_revision: None,
        force: false,
    }
}

#[tokio::test]
async fn status_moves_forward_only() {
    let (_tmp, repo) = test_repo().await;
    let ticket = repo
        .create(draft("forward", TicketStatus::Open, Some(Severity::Medium)))
        .await
        .unwrap();
    let id = ticket.id_string();
    assert_eq!(ticket.revision, 0);

    let ticket = repo
        .update_status(&id, change(TicketStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::InProgress);
    // Actor is recorded once the ticket enters active handling
    assert_eq!(ticket.claimed_by.as_deref(), Some("user:vol1"));

    let ticket = repo
        .update_status(&id, change(TicketStatus::Resolved))
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Resolved);
    assert_eq!(ticket.revision, 2);

    // Backward transition must conflict
    let err = repo
        .update_status(&id, change(TicketStatus::Open))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    // Same-status "transition" is not forward either
    let err = repo
        .update_status(&id, change(TicketStatus::Resolved))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn force_permits_backward_transition() {
    let (_tmp, repo) = test_repo().await;
    let ticket = repo
        .create(draft("override", TicketStatus::Open, Some(Severity::Low)))
        .await
        .unwrap();
    let id = ticket.id_string();

    repo.update_status(&id, change(TicketStatus::Resolved))
        .await
        .unwrap();

    let reopened = repo
        .update_status(
            &id,
            StatusChange {
                status: TicketStatus::Open,
                actor: Some("user:admin".to_string()),
                expected_revision: None,
                force: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, TicketStatus::Open);
}

#[tokio::test]
async fn stale_revision_conflicts() {
    let (_tmp, repo) = test_repo().await;
    let ticket = repo
        .create(draft("stale", TicketStatus::Open, Some(Severity::Low)))
        .await
        .unwrap();
    let id = ticket.id_string();

    let err = repo
        .update_status(
            &id,
            StatusChange {
                status: TicketStatus::InProgress,
                actor: None,
                expected_revision: Some(ticket.revision + 5),
                force: false,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    // The correct revision goes through
    let updated = repo
        .update_status(
            &id,
            StatusChange {
                status: TicketStatus::InProgress,
                actor: None,
                expected_revision: Some(ticket.revision),
                force: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.revision, ticket.revision + 1);
}

#[tokio::test]
async fn unknown_ticket_is_not_found() {
    let (_tmp, repo) = test_repo().await;
    assert!(repo.find_by_id("ticket:missing").await.unwrap().is_none());

    let err = repo
        .update_status("ticket:missing", change(TicketStatus::Resolved))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn list_orders_newest_first_and_filters() {
    let (_tmp, repo) = test_repo().await;
    for (i, status) in [
        TicketStatus::Open,
        TicketStatus::Open,
        TicketStatus::Resolved,
    ]
    .iter()
    .enumerate()
    {
        repo.create(draft(&format!("t{i}"), *status, Some(Severity::Low)))
            .await
            .unwrap();
        // created_at has millisecond resolution; keep orderings distinct
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let all = repo.find_all(&TicketFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].description, "t2");
    assert_eq!(all[2].description, "t0");

    let open = repo
        .find_all(&TicketFilter {
            status: Some(TicketStatus::Open),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(open.len(), 2);

    let capped = repo
        .find_all(&TicketFilter {
            status: None,
            limit: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[0].description, "t2");
}

#[tokio::test]
async fn pending_ticket_is_visible_and_promotable() {
    let (_tmp, repo) = test_repo().await;
    let ticket = repo
        .create(draft("pending", TicketStatus::PendingClassification, None))
        .await
        .unwrap();
    let id = ticket.id_string();
    assert_eq!(ticket.status, TicketStatus::PendingClassification);
    assert_eq!(ticket.severity, None);

    // The partial ticket is queryable, never silently absent
    let fetched = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(fetched.status, TicketStatus::PendingClassification);

    let classified = repo.set_classification(&id, Severity::Medium).await.unwrap();
    assert_eq!(classified.status, TicketStatus::Open);
    assert_eq!(classified.severity, Some(Severity::Medium));

    // Re-invoking overwrites severity without duplicating the ticket
    let reclassified = repo.set_classification(&id, Severity::High).await.unwrap();
    assert_eq!(reclassified.severity, Some(Severity::High));
    assert_eq!(reclassified.status, TicketStatus::Open);
    assert_eq!(repo.find_all(&TicketFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn late_classification_never_demotes_manual_status() {
    let (_tmp, repo) = test_repo().await;
    let ticket = repo
        .create(draft("raced", TicketStatus::PendingClassification, None))
        .await
        .unwrap();
    let id = ticket.id_string();

    repo.set_classification(&id, Severity::Low).await.unwrap();
    repo.update_status(&id, change(TicketStatus::InProgress))
        .await
        .unwrap();

    // A stale classification result lands afterwards
    let updated = repo.set_classification(&id, Severity::High).await.unwrap();
    assert_eq!(updated.severity, Some(Severity::High));
    assert_eq!(updated.status, TicketStatus::InProgress);
}

#[tokio::test]
async fn ingest_key_lookup_round_trips() {
    let (_tmp, repo) = test_repo().await;
    let mut d = draft("ingested", TicketStatus::Open, Some(Severity::Medium));
    d.ingest_key = Some("42/42_s2.png".to_string());
    repo.create(d).await.unwrap();

    assert!(
        repo.find_by_ingest_key("42/42_s2.png")
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        repo.find_by_ingest_key("43/43_s2.png")
            .await
            .unwrap()
            .is_none()
    );
}
