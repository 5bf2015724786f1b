use nativity::application::ports::{HistoryError, HistoryStore};
use nativity::domain::{
    CulturalNote, HistoryStatus, JobHistoryRecord, JobId, StatusUpdate, StorageKey, UserId,
};

use crate::helpers::{TestPostgres, segment};

fn draft(owner: &UserId) -> JobHistoryRecord {
    JobHistoryRecord::draft(
        owner.clone(),
        JobId::new(),
        "marathi".to_string(),
        StorageKey::upload("clip.mp4"),
        vec![segment(0, 0.5, 2.0, "namaskar mandali")],
        vec![CulturalNote {
            timestamp: "00:01".to_string(),
            kind: "greeting".to_string(),
            context: "hey folks".to_string(),
            adaptation: "namaskar mandali".to_string(),
            reasoning: "regional greeting".to_string(),
        }],
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_saved_draft_when_listing_then_segments_and_report_round_trip() {
    let test_pg = TestPostgres::new().await;
    let owner = UserId::new("pg-user").unwrap();
    let record = draft(&owner);

    test_pg.history_store.save_draft(&record).await.unwrap();
    let listed = test_pg.history_store.get_history(&owner, 10).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].job_id, record.job_id);
    assert_eq!(listed[0].status, HistoryStatus::NeedsReview);
    assert_eq!(listed[0].segments, record.segments);
    assert_eq!(listed[0].cultural_report, record.cultural_report);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_completion_when_updating_status_then_unset_fields_are_kept() {
    let test_pg = TestPostgres::new().await;
    let owner = UserId::new("pg-user").unwrap();
    let record = draft(&owner);
    test_pg.history_store.save_draft(&record).await.unwrap();
    let output = StorageKey::localized_output(&record.job_id, "marathi");

    test_pg
        .history_store
        .update_status(
            &owner,
            record.job_id,
            &StatusUpdate {
                output_key: Some(output.clone()),
                words_localized: Some(2),
                size_mb: Some(3.5),
                ..StatusUpdate::status(HistoryStatus::Complete)
            },
        )
        .await
        .unwrap();
    test_pg
        .history_store
        .update_status(&owner, record.job_id, &StatusUpdate::status(HistoryStatus::Complete))
        .await
        .unwrap();

    let stored = &test_pg.history_store.get_history(&owner, 10).await.unwrap()[0];
    assert_eq!(stored.status, HistoryStatus::Complete);
    assert_eq!(stored.output_key, Some(output));
    assert_eq!(stored.words_localized, Some(2));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_other_users_job_when_deleting_then_not_found() {
    let test_pg = TestPostgres::new().await;
    let owner = UserId::new("pg-user").unwrap();
    let record = draft(&owner);
    test_pg.history_store.save_draft(&record).await.unwrap();

    let error = test_pg
        .history_store
        .delete_job(&UserId::new("intruder").unwrap(), record.job_id)
        .await
        .unwrap_err();

    assert!(matches!(error, HistoryError::NotFound(_)));
    assert_eq!(test_pg.history_store.get_history(&owner, 10).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_failed_update_when_listing_then_error_column_is_read_back() {
    let test_pg = TestPostgres::new().await;
    let owner = UserId::new("pg-user").unwrap();
    let record = draft(&owner);
    test_pg.history_store.save_draft(&record).await.unwrap();

    test_pg
        .history_store
        .update_status(&owner, record.job_id, &StatusUpdate::failed("transfer failed: timeout"))
        .await
        .unwrap();

    let stored = &test_pg.history_store.get_history(&owner, 10).await.unwrap()[0];
    assert_eq!(stored.status, HistoryStatus::Failed);
    assert_eq!(stored.error.as_deref(), Some("transfer failed: timeout"));
}
