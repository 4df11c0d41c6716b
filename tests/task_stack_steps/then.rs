//! Then steps for task stack BDD scenarios.

use super::world::{TaskStackWorld, parse_titles, run_async, titles_of};
use rstest_bdd_macros::then;
use taskstack::task::{domain::Scope, ports::TaskRepository, services::TaskStackError};

#[then(r#"the stack reads "{titles}""#)]
fn stack_reads(world: &TaskStackWorld, titles: String) -> Result<(), eyre::Report> {
    let expected = parse_titles(&titles);
    let actual = world.titles()?;
    if actual != expected {
        return Err(eyre::eyre!("expected stack {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("the stack is empty")]
fn stack_is_empty(world: &TaskStackWorld) -> Result<(), eyre::Report> {
    let actual = world.titles()?;
    if !actual.is_empty() {
        return Err(eyre::eyre!("expected an empty stack, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the notice is "{message}""#)]
fn notice_is(world: &TaskStackWorld, message: String) -> Result<(), eyre::Report> {
    let notice = world
        .last_notice
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no notice recorded"))?;
    if notice.to_string() != message {
        return Err(eyre::eyre!("expected notice {message:?}, got {notice}"));
    }
    Ok(())
}

#[then("every task is complete")]
fn every_task_complete(world: &TaskStackWorld) -> Result<(), eyre::Report> {
    let completion = world
        .last_completion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no completion recorded"))?;
    if !completion.all_complete {
        return Err(eyre::eyre!("completion did not empty the stack"));
    }
    Ok(())
}

#[then(r#"the follow-up notice is "{message}""#)]
fn follow_up_notice_is(world: &TaskStackWorld, message: String) -> Result<(), eyre::Report> {
    let follow_up = world
        .last_completion
        .as_ref()
        .and_then(|completion| completion.follow_up())
        .ok_or_else(|| eyre::eyre!("no follow-up notice recorded"))?;
    if follow_up.to_string() != message {
        return Err(eyre::eyre!("expected follow-up {message:?}, got {follow_up}"));
    }
    Ok(())
}

#[then("nothing can be undone")]
fn nothing_to_undo(world: &TaskStackWorld) -> Result<(), eyre::Report> {
    if run_async(world.service.can_undo())? {
        return Err(eyre::eyre!("expected an empty undo history"));
    }
    Ok(())
}

#[then("nothing can be redone")]
fn nothing_to_redo(world: &TaskStackWorld) -> Result<(), eyre::Report> {
    if run_async(world.service.can_redo())? {
        return Err(eyre::eyre!("expected an empty redo history"));
    }
    Ok(())
}

#[then(r#"the stored guest tasks read "{titles}""#)]
fn stored_guest_tasks(world: &TaskStackWorld, titles: String) -> Result<(), eyre::Report> {
    let expected = parse_titles(&titles);
    let stored = run_async(world.guest_tasks.load_all(&Scope::Guest))?;
    let actual = titles_of(&stored);
    if actual != expected {
        return Err(eyre::eyre!(
            "expected stored guest tasks {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then("the operation fails because no session is active")]
fn fails_without_session(world: &TaskStackWorld) -> Result<(), eyre::Report> {
    if !matches!(world.last_error, Some(TaskStackError::NoActiveSession)) {
        return Err(eyre::eyre!(
            "expected NoActiveSession, got {:?}",
            world.last_error
        ));
    }
    Ok(())
}
