use nativity::application::ports::{JobRegistry, RegistryError};
use nativity::domain::{JobId, JobStatus, JobTransition, StorageKey};
use nativity::infrastructure::persistence::InMemoryJobRegistry;

#[tokio::test]
async fn given_created_job_when_getting_then_pending_snapshot_is_returned() {
    let registry = InMemoryJobRegistry::new();

    let id = registry
        .create(StorageKey::upload("clip.mp4"), "bengali", None)
        .await
        .unwrap();
    let job = registry.get(id).await.unwrap().unwrap();

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.target_language, "bengali");
    assert_eq!(registry.job_count().await, 1);
}

#[tokio::test]
async fn given_unknown_job_when_transitioning_then_not_found() {
    let registry = InMemoryJobRegistry::new();

    let error = registry
        .transition(JobId::new(), JobTransition::new(JobStatus::Uploading, 10, "x"))
        .await
        .unwrap_err();

    assert!(matches!(error, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn given_invalid_edge_when_transitioning_then_state_is_unchanged() {
    let registry = InMemoryJobRegistry::new();
    let id = registry
        .create(StorageKey::upload("clip.mp4"), "bengali", None)
        .await
        .unwrap();

    let error = registry
        .transition(id, JobTransition::new(JobStatus::Complete, 100, "skip ahead"))
        .await
        .unwrap_err();

    assert!(matches!(error, RegistryError::Transition(_)));
    assert_eq!(registry.get(id).await.unwrap().unwrap().status, JobStatus::Pending);
}

#[tokio::test]
async fn given_missing_job_when_getting_then_none() {
    let registry = InMemoryJobRegistry::new();

    assert!(registry.get(JobId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn given_running_job_when_restarting_then_busy_and_state_is_unchanged() {
    let registry = InMemoryJobRegistry::new();
    let id = registry
        .create(StorageKey::upload("clip.mp4"), "bengali", None)
        .await
        .unwrap();
    registry
        .transition(id, JobTransition::new(JobStatus::Uploading, 10, "downloading"))
        .await
        .unwrap();

    let error = registry.restart(id, "again").await.unwrap_err();

    assert!(matches!(error, RegistryError::Busy(_)));
    let job = registry.get(id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Uploading);
    assert_eq!(job.progress, 10);
}

#[tokio::test]
async fn given_failed_job_when_restarting_then_previous_state_is_returned_and_job_is_pending() {
    let registry = InMemoryJobRegistry::new();
    let id = registry
        .create(StorageKey::upload("clip.mp4"), "bengali", None)
        .await
        .unwrap();
    registry.fail(id, "voice rejected").await.unwrap();

    let previous = registry.restart(id, "Finalization queued").await.unwrap();

    assert_eq!(previous.status, JobStatus::Failed);
    assert_eq!(previous.error.as_deref(), Some("voice rejected"));
    let job = registry.get(id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.message, "Finalization queued");
    assert!(job.error.is_none());
    assert!(matches!(registry.restart(id, "twice").await, Err(RegistryError::Busy(_))));
}
