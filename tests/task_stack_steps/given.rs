//! Given steps for task stack BDD scenarios.

use super::world::{TaskStackWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskstack::task::domain::TaskDraft;

#[given("a guest session")]
fn guest_session(world: &mut TaskStackWorld) {
    world.session.continue_as_guest();
}

#[given("a signed-out session")]
fn signed_out_session(world: &mut TaskStackWorld) {
    world.session.sign_out();
}

#[given(r#"the stack holds "{title}""#)]
fn stack_holds(world: &mut TaskStackWorld, title: String) -> Result<(), eyre::Report> {
    run_async(world.service.push(TaskDraft::new(title)))
        .wrap_err("push task in scenario setup")?;
    Ok(())
}
