//! Step definitions for task stack behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
