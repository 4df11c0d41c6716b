//! When steps for task stack BDD scenarios.

use super::world::{TaskStackWorld, run_async};
use rstest_bdd_macros::when;
use taskstack::task::{
    domain::{TaskDraft, UserId},
    services::StackOperation,
};
use uuid::Uuid;

#[when(r#"the user pushes "{title}""#)]
fn push_task(world: &mut TaskStackWorld, title: String) {
    let result = run_async(world.service.push(TaskDraft::new(title)));
    world.record(StackOperation::Push, result);
}

#[when("the user pops the top task")]
fn pop_task(world: &mut TaskStackWorld) {
    let result = run_async(world.service.pop());
    world.record(StackOperation::Pop, result);
}

#[when("the user undoes the last operation")]
fn undo_operation(world: &mut TaskStackWorld) {
    let result = run_async(world.service.undo());
    world.record(StackOperation::Undo, result);
}

#[when("the user redoes the last operation")]
fn redo_operation(world: &mut TaskStackWorld) {
    let result = run_async(world.service.redo());
    world.record(StackOperation::Redo, result);
}

#[when(r#"the user completes "{title}""#)]
fn complete_task(world: &mut TaskStackWorld, title: String) -> Result<(), eyre::Report> {
    let tasks = run_async(world.service.iterate())?.value;
    let task = tasks
        .iter()
        .find(|task| task.title().as_str() == title)
        .ok_or_else(|| eyre::eyre!("no task titled {title} on the stack"))?;
    let result = run_async(world.service.complete(task.id()));
    world.last_completion = world.record(StackOperation::Complete, result);
    Ok(())
}

#[when("the user clears the stack")]
fn clear_stack(world: &mut TaskStackWorld) {
    let result = run_async(world.service.clear());
    world.record(StackOperation::Clear, result);
}

#[when("the user signs in")]
fn sign_in(world: &mut TaskStackWorld) {
    world.session.sign_in(UserId::from_uuid(Uuid::new_v4()));
}
