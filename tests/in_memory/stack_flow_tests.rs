//! In-memory integration tests for stack flows.

use std::sync::Arc;

use super::helpers::{StackHarness, TestService, harness, titles};
use eyre::ensure;
use rstest::rstest;
use taskstack::task::{
    adapters::ScopedTaskRepository,
    domain::{Scope, TaskDraft},
    ports::{KeyValueStore, TaskRepository},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guest_flow_is_mirrored_to_local_blob(harness: StackHarness) -> eyre::Result<()> {
    let service = &harness.service;
    service.push(TaskDraft::new("Buy milk")).await?;
    service.push(TaskDraft::new("Walk dog")).await?;
    service.pop().await?;
    service.undo().await?;

    let after_undo = harness.guest.load_all(&Scope::Guest).await?;
    ensure!(titles(&after_undo) == ["Walk dog", "Buy milk"]);

    service.redo().await?;
    let after_redo = harness.guest.load_all(&Scope::Guest).await?;
    ensure!(titles(&after_redo) == ["Buy milk"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guest_blob_uses_camel_case_records(harness: StackHarness) -> eyre::Result<()> {
    harness
        .service
        .push(TaskDraft::new("Pay rent").with_due_date("2026-11-01"))
        .await?;

    let blob = harness
        .guest
        .store()
        .get("guestTasks")
        .await?
        .ok_or_else(|| eyre::eyre!("guest blob missing"))?;
    let records: serde_json::Value = serde_json::from_str(&blob)?;
    let first = records
        .get(0)
        .ok_or_else(|| eyre::eyre!("guest blob is empty"))?;

    ensure!(first.get("dueDate") == Some(&serde_json::json!("2026-11-01")));
    ensure!(first.get("dueTime") == Some(&serde_json::json!("")));
    ensure!(first.get("stackPosition") == Some(&serde_json::json!(0)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_every_task_empties_storage(harness: StackHarness) -> eyre::Result<()> {
    let service = &harness.service;
    let first = service.push(TaskDraft::new("First")).await?.value;
    let second = service.push(TaskDraft::new("Second")).await?.value;

    let partial = service.complete(second.id()).await?;
    let last = service.complete(first.id()).await?;

    ensure!(!partial.value.all_complete);
    ensure!(last.value.all_complete);
    ensure!(harness.guest.load_all(&Scope::Guest).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restarted_service_resumes_from_storage(harness: StackHarness) -> eyre::Result<()> {
    harness.service.push(TaskDraft::new("Persisted")).await?;
    harness.service.push(TaskDraft::new("Also persisted")).await?;

    let restarted = TestService::new(
        Arc::new(ScopedTaskRepository::new(
            harness.guest.clone(),
            harness.remote.clone(),
        )),
        Arc::new(harness.session.clone()),
    );
    let view = restarted.view().await?;

    ensure!(titles(&view.tasks) == ["Also persisted", "Persisted"]);
    ensure!(!view.can_undo && !view.can_redo);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_guest_records_are_skipped_on_load(harness: StackHarness) -> eyre::Result<()> {
    let blob = format!(
        r#"[{{"id":"not-a-uuid","title":"x"}},{{"id":"{}","title":"Survivor"}}]"#,
        uuid::Uuid::new_v4()
    );
    harness.guest.store().set("guestTasks", &blob).await?;

    let view = harness.service.view().await?;

    ensure!(titles(&view.tasks) == ["Survivor"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn corrupt_guest_blob_can_still_be_cleared(harness: StackHarness) -> eyre::Result<()> {
    harness.guest.store().set("guestTasks", "{not json").await?;
    ensure!(harness.service.view().await.is_err());

    harness.service.clear().await?;

    ensure!(harness.guest.store().get("guestTasks").await?.is_none());
    harness.service.push(TaskDraft::new("Fresh start")).await?;
    ensure!(titles(&harness.guest.load_all(&Scope::Guest).await?) == ["Fresh start"]);
    Ok(())
}
