use nativity::application::ports::{HistoryError, HistoryStore};
use nativity::domain::{HistoryStatus, JobHistoryRecord, JobId, StatusUpdate, StorageKey, UserId};
use nativity::infrastructure::persistence::InMemoryHistoryStore;

use crate::helpers::segment;

fn user(raw: &str) -> UserId {
    UserId::new(raw).unwrap()
}

fn record(owner: &UserId) -> JobHistoryRecord {
    JobHistoryRecord::draft(
        owner.clone(),
        JobId::new(),
        "telugu".to_string(),
        StorageKey::upload("clip.mp4"),
        vec![segment(0, 0.0, 1.0, "namaskaram")],
        Vec::new(),
    )
}

#[tokio::test]
async fn given_saved_drafts_when_listing_then_newest_first_and_limited() {
    let store = InMemoryHistoryStore::new();
    let owner = user("u1");
    let mut older = record(&owner);
    older.created_at -= chrono::Duration::minutes(5);
    let newer = record(&owner);
    store.save_draft(&older).await.unwrap();
    store.save_draft(&newer).await.unwrap();

    let all = store.get_history(&owner, 10).await.unwrap();
    let limited = store.get_history(&owner, 1).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].job_id, newer.job_id);
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn given_other_users_record_when_updating_then_not_found() {
    let store = InMemoryHistoryStore::new();
    let owner = user("u1");
    let draft = record(&owner);
    store.save_draft(&draft).await.unwrap();

    let error = store
        .update_status(&user("u2"), draft.job_id, &StatusUpdate::status(HistoryStatus::Complete))
        .await
        .unwrap_err();

    assert!(matches!(error, HistoryError::NotFound(_)));
    let kept = store.get_history(&owner, 10).await.unwrap();
    assert_eq!(kept[0].status, HistoryStatus::NeedsReview);
}

#[tokio::test]
async fn given_edited_segments_when_updating_then_segments_and_status_replaced() {
    let store = InMemoryHistoryStore::new();
    let owner = user("u1");
    let draft = record(&owner);
    store.save_draft(&draft).await.unwrap();
    let edited = vec![segment(0, 0.0, 1.0, "edited"), segment(1, 1.0, 2.0, "added")];

    store
        .update_segments(&owner, draft.job_id, &edited, Some(HistoryStatus::Processing))
        .await
        .unwrap();

    let stored = &store.get_history(&owner, 10).await.unwrap()[0];
    assert_eq!(stored.segments, edited);
    assert_eq!(stored.status, HistoryStatus::Processing);
}

#[tokio::test]
async fn given_record_when_deleted_twice_then_second_delete_is_not_found() {
    let store = InMemoryHistoryStore::new();
    let owner = user("u1");
    let draft = record(&owner);
    store.save_draft(&draft).await.unwrap();

    store.delete_job(&owner, draft.job_id).await.unwrap();
    let second = store.delete_job(&owner, draft.job_id).await;

    assert!(matches!(second, Err(HistoryError::NotFound(_))));
}

#[tokio::test]
async fn given_failed_update_when_listing_then_failure_reason_is_kept() {
    let store = InMemoryHistoryStore::new();
    let owner = user("u1");
    let draft = record(&owner);
    store.save_draft(&draft).await.unwrap();

    store
        .update_status(&owner, draft.job_id, &StatusUpdate::failed("speech synthesis failed"))
        .await
        .unwrap();

    let stored = &store.get_history(&owner, 10).await.unwrap()[0];
    assert_eq!(stored.status, HistoryStatus::Failed);
    assert_eq!(stored.error.as_deref(), Some("speech synthesis failed"));
}
