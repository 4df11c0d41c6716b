//! Application services for task stack orchestration.

mod notice;
mod stack;

pub use notice::{Outcome, StackNotice, StackOperation};
pub use stack::{
    Completion, PersistencePolicy, StackView, TaskStackError, TaskStackResult, TaskStackService,
};
