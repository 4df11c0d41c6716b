//! In-memory integration tests for scope routing.

use super::helpers::{StackHarness, harness, titles};
use eyre::ensure;
use rstest::rstest;
use taskstack::task::{
    domain::{Scope, TaskDraft, UserId},
    ports::TaskRepository,
    services::TaskStackError,
};
use uuid::Uuid;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_tasks_are_written_to_remote_backend(harness: StackHarness) -> eyre::Result<()> {
    let user = Scope::User(UserId::from_uuid(Uuid::new_v4()));
    harness.service.push(TaskDraft::new("Guest chore")).await?;

    harness.session.sign_in(user.user_id().ok_or_else(|| eyre::eyre!("user scope"))?);
    harness.service.push(TaskDraft::new("Team standup")).await?;

    let remote = harness.remote.load_all(&user).await?;
    let guest = harness.guest.load_all(&Scope::Guest).await?;
    ensure!(titles(&remote) == ["Team standup"]);
    ensure!(titles(&guest) == ["Guest chore"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_do_not_see_each_others_tasks(harness: StackHarness) -> eyre::Result<()> {
    let alice = UserId::from_uuid(Uuid::new_v4());
    let bob = UserId::from_uuid(Uuid::new_v4());

    harness.session.sign_in(alice);
    harness.service.push(TaskDraft::new("Alice task")).await?;
    harness.session.sign_in(bob);

    ensure!(harness.service.view().await?.tasks.is_empty());
    harness.session.sign_in(alice);
    ensure!(titles(&harness.service.view().await?.tasks) == ["Alice task"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sign_out_blocks_operations(harness: StackHarness) -> eyre::Result<()> {
    harness.service.push(TaskDraft::new("Guest chore")).await?;
    harness.session.sign_out();

    let result = harness.service.view().await;

    ensure!(matches!(result, Err(TaskStackError::NoActiveSession)));
    Ok(())
}
